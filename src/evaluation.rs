use std::cell::RefCell;
use std::rc::Rc;

use crate::dependencies::Dependencies;
use crate::{Observable, ReadOnlyVar};

/// Tracks the vars read by a single run of a binding.
///
/// A binding receives `&Evaluation` and cannot keep it past its own return,
/// so every evaluation is used exactly once.
pub struct Evaluation {
	inner: RefCell<EvaluationInner>,
}

impl AsRef<Evaluation> for Evaluation {
	fn as_ref(&self) -> &Evaluation {
		self
	}
}

struct EvaluationInner {
	dependencies: Dependencies,
}

impl Evaluation {
	pub(crate) fn new() -> Self {
		Evaluation {
			inner: RefCell::new(EvaluationInner {
				dependencies: Dependencies::new(),
			}),
		}
	}

	/// Records `var` as a dependency and returns its value, computing it
	/// first if it is stale.
	///
	/// # Panics
	///
	/// Panics if reading `var` fails, see [`ReadOnlyVar::get`].
	pub fn read<T, V>(&self, var: &V) -> T
	where
		T: 'static,
		V: ReadOnlyVar<T> + ?Sized,
	{
		self.based_on(var.observable());
		var.get()
	}

	/// Number of distinct vars read so far.
	pub fn dependency_count(&self) -> usize {
		self.inner.borrow().dependencies.len()
	}

	pub(crate) fn based_on(&self, observable: Rc<dyn Observable>) {
		self.inner.borrow_mut().dependencies.based_on(observable);
	}

	pub(crate) fn take(self) -> Dependencies {
		self.inner.into_inner().dependencies
	}
}
