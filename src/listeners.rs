use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::{Listener, Value};

type List<T> = SmallVec<[Listener<T>; 4]>;

/// Listeners of a single var, in registration order.
///
/// A notification pass iterates over a snapshot of the list. Adding or
/// removing while a pass holds the snapshot copies the list, so the pass in
/// progress neither skips nor repeats anyone.
pub(crate) struct Listeners<T> {
	list: RefCell<Rc<List<T>>>,
}

impl<T> Listeners<T>
where
	T: 'static,
{
	pub fn new() -> Self {
		Listeners {
			list: RefCell::new(Rc::new(SmallVec::new())),
		}
	}

	pub fn len(&self) -> usize {
		self.list.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.borrow().is_empty()
	}

	pub fn add(&self, listener: Listener<T>) {
		let mut list = self.list.borrow_mut();
		if !list.contains(&listener) {
			Rc::make_mut(&mut *list).push(listener);
		}
	}

	pub fn remove(&self, listener: &Listener<T>) {
		let mut list = self.list.borrow_mut();
		if let Some(index) = list.iter().position(|l| l == listener) {
			Rc::make_mut(&mut *list).remove(index);
		}
	}

	pub fn notify(&self, var: &Value<T>) {
		// Declared before the snapshot so that it runs after the snapshot
		// is released, and also when a listener panics.
		let _prune = Prune { listeners: self };
		let snapshot = self.list.borrow().clone();

		for listener in snapshot.iter() {
			listener.on_change(var);
		}
	}

	fn prune(&self) {
		// Listeners may look at this registry from should_be_disposed, so
		// they are asked outside of any borrow.
		let snapshot = self.list.borrow().clone();
		let disposed: List<T> = snapshot
			.iter()
			.filter(|l| l.should_be_disposed())
			.cloned()
			.collect();
		drop(snapshot);

		if disposed.is_empty() {
			return;
		}

		tracing::debug!(disposed = disposed.len(), "pruning disposed listeners");
		let mut list = self.list.borrow_mut();
		Rc::make_mut(&mut *list).retain(|l| !disposed.contains(l));
	}
}

struct Prune<'a, T: 'static> {
	listeners: &'a Listeners<T>,
}

impl<'a, T: 'static> Drop for Prune<'a, T> {
	fn drop(&mut self) {
		self.listeners.prune()
	}
}
