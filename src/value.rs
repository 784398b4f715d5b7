use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::{Const, Error, Evaluation, Listener, Observable};

/// A read-only view of any var.
pub struct Value<T> {
	value: Rc<dyn Access<T>>,
}

impl<T> Clone for Value<T> {
	fn clone(&self) -> Self {
		Value {
			value: self.value.clone(),
		}
	}
}

impl<T> Value<T>
where
	T: 'static,
{
	pub fn new(value: Rc<dyn Access<T>>) -> Self {
		Value { value }
	}

	/// A constant read-only value, see [`Const`].
	pub fn constant(value: T) -> Self
	where
		T: Clone,
	{
		Const::new(value).into()
	}

	/// Whether both handles point to the same var.
	pub fn ptr_eq(&self, other: &Value<T>) -> bool {
		std::ptr::eq(
			Rc::as_ptr(&self.value).cast::<()>(),
			Rc::as_ptr(&other.value).cast::<()>(),
		)
	}
}

/// The typed side of a var.
pub trait Access<T>: Observable {
	/// Returns the current value, recomputing it first if it is stale.
	fn get(&self) -> Result<T, Error>;

	fn add_listener(&self, listener: Listener<T>);

	fn remove_listener(&self, listener: &Listener<T>);

	fn as_observable(self: Rc<Self>) -> Rc<dyn Observable>;
}

/// Reading and listening, shared by [`Var`](crate::Var), [`Value`] and
/// [`Const`].
pub trait ReadOnlyVar<T>
where
	T: 'static,
{
	fn access(&self) -> &dyn Access<T>;

	fn read_only(&self) -> Value<T>;

	fn observable(&self) -> Rc<dyn Observable> {
		self.read_only().value.as_observable()
	}

	fn name(&self) -> &'static str {
		self.access().name()
	}

	/// Gets (and computes if necessary) the current value.
	///
	/// Inside a binding use [`ReadOnlyVar::read`] instead so that the var is
	/// tracked as a dependency.
	///
	/// # Panics
	///
	/// Panics if the var is read from its own binding, and propagates any
	/// panic of the binding itself. The var stays stale in both cases.
	fn get(&self) -> T {
		match self.access().get() {
			Ok(value) => value,
			Err(err) => panic!("{err}"),
		}
	}

	/// Like [`ReadOnlyVar::get`], but reports failures as an [`Error`].
	///
	/// A panic raised by a binding further down the dependency chain is
	/// reported as [`Error::Panicked`] of this var.
	fn try_get(&self) -> Result<T, Error> {
		let access = self.access();
		match panic::catch_unwind(AssertUnwindSafe(|| access.get())) {
			Ok(result) => result,
			Err(payload) => Err(Error::panicked(access.name(), payload)),
		}
	}

	/// Receiver-style [`Evaluation::read`].
	fn read(&self, cx: &Evaluation) -> T
	where
		Self: Sized,
	{
		cx.read(self)
	}

	/// Adds a strong reference to `listener`. Adding the same listener
	/// twice has no effect.
	fn add_listener(&self, listener: Listener<T>) {
		self.access().add_listener(listener)
	}

	/// Adds `listener` and fires it once right away.
	fn add_listener_and_fire(&self, listener: Listener<T>) {
		self.add_listener(listener.clone());
		listener.on_change(&self.read_only());
	}

	fn remove_listener(&self, listener: &Listener<T>) {
		self.access().remove_listener(listener)
	}

	/// Marks the var as stale. Does nothing if it is already stale.
	fn invalidate(&self) {
		self.access().invalidate()
	}

	fn listener_count(&self) -> usize {
		self.access().listener_count()
	}
}

impl<T> ReadOnlyVar<T> for Value<T>
where
	T: 'static,
{
	fn access(&self) -> &dyn Access<T> {
		&*self.value
	}

	fn read_only(&self) -> Value<T> {
		self.clone()
	}

	fn observable(&self) -> Rc<dyn Observable> {
		self.value.clone().as_observable()
	}
}

impl<T> Display for Value<T>
where
	T: Display + 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.get().fmt(f)
	}
}

impl<T> Debug for Value<T>
where
	T: 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Value").field("name", &self.name()).finish()
	}
}
