use std::rc::Rc;

use fxhash::FxBuildHasher;
use indexmap::IndexSet;

use crate::addr::RcAddr;
use crate::{InvalListener, Observable};

/// Observables read by one evaluation, in the order they were first read.
#[derive(Default)]
pub struct Dependencies {
	based_on: IndexSet<RcAddr<dyn Observable>, FxBuildHasher>,
}

impl Dependencies {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn based_on(&mut self, observable: Rc<dyn Observable>) {
		self.based_on.insert(RcAddr::new(observable));
	}

	pub fn len(&self) -> usize {
		self.based_on.len()
	}

	pub fn any_stale(&self) -> bool {
		self.based_on.iter().any(|item| item.is_stale())
	}

	pub fn release(&self, listener: &Rc<InvalListener>) {
		for item in &self.based_on {
			item.unsubscribe(listener)
		}
	}

	/// Replaces the current set with `next`, moving the subscription of
	/// `listener` accordingly. Returns the previous set so that the caller
	/// can drop it outside of any borrow.
	pub fn swap(&mut self, next: Dependencies, listener: &Rc<InvalListener>) -> Dependencies {
		let prev = std::mem::replace(&mut self.based_on, next.based_on);

		// Diff the keys
		prev.iter()
			.filter(|k| !self.based_on.contains(*k))
			.for_each(|k| k.unsubscribe(listener));

		self.based_on
			.iter()
			.filter(|k| !prev.contains(*k))
			.for_each(|k| k.subscribe(listener));

		Dependencies { based_on: prev }
	}
}
