use std::cell::Cell;
use std::rc::Weak;

use crate::{Observable, Value, VarChangedListener};

/// Invalidates a dependent whenever one of its dependencies changes.
///
/// Only a weak reference to the dependent is kept, so being subscribed does
/// not keep it alive. Once the dependent is gone the listener asks to be
/// disposed and the dependency drops it after its next notification.
pub struct InvalListener {
	target: Weak<dyn Observable>,
	gone: Cell<bool>,
}

impl InvalListener {
	pub(crate) fn new(target: Weak<dyn Observable>) -> Self {
		InvalListener {
			target,
			gone: Cell::new(false),
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.gone.get()
	}
}

impl<T> VarChangedListener<T> for InvalListener
where
	T: 'static,
{
	fn on_change(&self, _: &Value<T>) {
		if self.gone.get() {
			return;
		}

		match self.target.upgrade() {
			Some(target) => target.invalidate(),
			None => {
				tracing::trace!("dependent was dropped, disposing its listener");
				self.gone.set(true);
			}
		}
	}

	fn should_be_disposed(&self) -> bool {
		self.gone.get()
	}
}
