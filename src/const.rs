use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::value::{Access, ReadOnlyVar, Value};
use crate::{Error, InvalListener, Listener, Observable, UNNAMED};

/// A read-only value that never changes.
///
/// Unlike a [`Var`](crate::Var) holding a constant, it keeps no listeners
/// and no dependencies.
pub struct Const<T> {
	body: Rc<ConstBody<T>>,
}

impl<T> Clone for Const<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

struct ConstBody<T> {
	value: T,
}

impl<T> Const<T> {
	pub fn new(value: T) -> Self {
		Const {
			body: Rc::new(ConstBody { value }),
		}
	}

	pub fn value(&self) -> &T {
		&self.body.value
	}
}

impl<T> Observable for ConstBody<T>
where
	T: 'static,
{
	fn name(&self) -> &'static str {
		UNNAMED
	}

	fn invalidate(&self) {}
	fn subscribe(&self, _: &Rc<InvalListener>) {}
	fn unsubscribe(&self, _: &Rc<InvalListener>) {}

	fn listener_count(&self) -> usize {
		0
	}

	fn is_stale(&self) -> bool {
		false
	}
}

impl<T> Access<T> for ConstBody<T>
where
	T: Clone + 'static,
{
	fn get(&self) -> Result<T, Error> {
		Ok(self.value.clone())
	}

	fn add_listener(&self, _: Listener<T>) {}
	fn remove_listener(&self, _: &Listener<T>) {}

	fn as_observable(self: Rc<Self>) -> Rc<dyn Observable> {
		self
	}
}

impl<T> ReadOnlyVar<T> for Const<T>
where
	T: Clone + 'static,
{
	fn access(&self) -> &dyn Access<T> {
		&*self.body
	}

	fn read_only(&self) -> Value<T> {
		Value::new(self.body.clone())
	}

	fn get(&self) -> T {
		self.body.value.clone()
	}
}

impl<T> From<Const<T>> for Value<T>
where
	T: Clone + 'static,
{
	fn from(value: Const<T>) -> Self {
		Value::new(value.body)
	}
}

impl<T> Display for Const<T>
where
	T: Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.value().fmt(f)
	}
}

impl<T> Debug for Const<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.value().fmt(f)
	}
}
