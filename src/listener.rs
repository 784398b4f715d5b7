use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::addr::RcAddr;
use crate::Value;

/// Called when a var is changed or invalidated.
///
/// Listeners are fired when a var becomes stale, not when it is recomputed
/// afterwards.
pub trait VarChangedListener<T>: 'static {
	fn on_change(&self, var: &Value<T>);

	/// Once this returns `true` it must keep returning `true`. The var
	/// drops such listeners after its next notification.
	fn should_be_disposed(&self) -> bool {
		false
	}
}

/// A shared listener handle. Two handles are equal when they point
/// to the same listener.
pub struct Listener<T> {
	inner: RcAddr<dyn VarChangedListener<T>>,
}

impl<T> Clone for Listener<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> PartialEq for Listener<T> {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Listener<T> {}

impl<T> Debug for Listener<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Listener").field(&self.inner.addr()).finish()
	}
}

impl<T> Listener<T>
where
	T: 'static,
{
	pub fn new<F>(func: F) -> Self
	where
		F: Fn(&Value<T>) + 'static,
	{
		Self::from_rc(Rc::new(FnListener { func }))
	}

	/// A listener that runs `func` on the first change only and then asks
	/// to be disposed.
	pub fn once<F>(func: F) -> Self
	where
		F: Fn(&Value<T>) + 'static,
	{
		Self::from_rc(Rc::new(OnceListener {
			func,
			fired: Cell::new(false),
		}))
	}

	pub fn from_rc(listener: Rc<dyn VarChangedListener<T>>) -> Self {
		Listener {
			inner: RcAddr::new(listener),
		}
	}

	#[inline]
	pub fn on_change(&self, var: &Value<T>) {
		self.inner.on_change(var)
	}

	#[inline]
	pub fn should_be_disposed(&self) -> bool {
		self.inner.should_be_disposed()
	}
}

impl<T, L> From<Rc<L>> for Listener<T>
where
	T: 'static,
	L: VarChangedListener<T>,
{
	fn from(listener: Rc<L>) -> Self {
		Listener::from_rc(listener)
	}
}

struct FnListener<F> {
	func: F,
}

impl<T, F> VarChangedListener<T> for FnListener<F>
where
	F: Fn(&Value<T>) + 'static,
{
	fn on_change(&self, var: &Value<T>) {
		(self.func)(var)
	}
}

struct OnceListener<F> {
	func: F,
	fired: Cell<bool>,
}

impl<T, F> VarChangedListener<T> for OnceListener<F>
where
	F: Fn(&Value<T>) + 'static,
{
	fn on_change(&self, var: &Value<T>) {
		if !self.fired.replace(true) {
			(self.func)(var)
		}
	}

	fn should_be_disposed(&self) -> bool {
		self.fired.get()
	}
}
