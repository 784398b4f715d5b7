//! Lazy, dependency-tracked observable values.
//!
//! A [`Var`] holds either a constant, a computation over other vars, or a
//! retained value that a computation keeps mutating. Reading a var through an
//! [`Evaluation`] records it as a dependency; when a dependency changes, every
//! dependent is marked stale and recomputes on its next [`ReadOnlyVar::get`].
//!
//! ```
//! use varbind::{computed, ReadOnlyVar, Var};
//!
//! let width = Var::new(10);
//! let area = computed({
//! 	let width = width.clone();
//! 	move |cx| cx.read(&width) * 2
//! });
//!
//! assert_eq!(area.get(), 20);
//! width.set(15);
//! assert_eq!(area.get(), 30);
//! ```

pub mod macros;

mod addr;
mod r#const;
mod dependencies;
mod error;
mod evaluation;
mod invalidation;
mod listener;
mod listeners;
mod ops;
mod specialized;
mod value;
mod var;

use std::rc::Rc;

pub use error::Error;
pub use evaluation::Evaluation;
pub use invalidation::InvalListener;
pub use listener::{Listener, VarChangedListener};
pub use ops::{Numeric, ToConstVar, Toggle};
pub use r#const::Const;
pub use specialized::*;
pub use value::{Access, ReadOnlyVar, Value};
pub use var::Var;

pub(crate) const UNNAMED: &str = "<unnamed>";

/// The type-erased side of a var, used to track it as a dependency.
pub trait Observable: 'static {
	/// Label used in logs and errors.
	fn name(&self) -> &'static str;

	/// Mark this observable as stale. Listeners are notified only
	/// if it was valid before the call.
	fn invalidate(&self);

	/// Notify this observable that a dependent started
	/// to listen.
	fn subscribe(&self, listener: &Rc<InvalListener>);

	/// Notify this observable that a dependent stopped
	/// to listen.
	fn unsubscribe(&self, listener: &Rc<InvalListener>);

	fn listener_count(&self) -> usize;

	/// Whether the next read has to recompute.
	fn is_stale(&self) -> bool;
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum State {
	Valid,
	Invalid,
	/// The binding is running. `invalidated` records a change to one of the
	/// previous dependencies that happened in the meantime.
	Evaluating { invalidated: bool },
}

/// Creates a var holding `value` as a constant.
pub fn constant<T>(value: T) -> Var<T>
where
	T: Clone + 'static,
{
	Var::new(value)
}

/// Creates a var computed lazily from `func`.
pub fn computed<T, F>(func: F) -> Var<T>
where
	T: Clone + 'static,
	F: Fn(&Evaluation) -> T + 'static,
{
	Var::computed(func)
}

/// Like [`computed`], but evaluates once right away so that the
/// dependencies are registered before the first read.
pub fn eager_computed<T, F>(func: F) -> Var<T>
where
	T: Clone + 'static,
	F: Fn(&Evaluation) -> T + 'static,
{
	Var::eager_computed(func)
}

/// Creates a var that keeps `item` and passes it through `func`
/// every time it is recomputed.
pub fn side_effecting<T, F>(item: T, func: F) -> Var<T>
where
	T: Clone + 'static,
	F: Fn(&Evaluation, T) -> T + 'static,
{
	Var::new_side_effecting(item, func)
}
