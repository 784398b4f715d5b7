use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Display};
use std::rc::{Rc, Weak};

use crate::dependencies::Dependencies;
use crate::evaluation::Evaluation;
use crate::listeners::Listeners;
use crate::value::{Access, ReadOnlyVar, Value};
use crate::{Error, InvalListener, Listener, Observable, State, UNNAMED};

type Compute<T> = Rc<dyn Fn(&Evaluation) -> T>;
type SideEffect<T> = Rc<dyn Fn(&Evaluation, T) -> T>;

/// A mutable observable value.
///
/// The value comes from its current binding: a constant set with
/// [`Var::set`], a computation installed with [`Var::bind`], or a retained
/// value passed through a function by [`Var::side_effecting`]. Computations
/// run lazily, on the first [`get`](ReadOnlyVar::get) after the var became
/// stale.
///
/// Cloning a `Var` clones the handle, not the value.
pub struct Var<T> {
	body: Rc<VarBody<T>>,
}

pub(crate) struct VarBody<T> {
	name: Cell<&'static str>,
	inner: RefCell<VarInner<T>>,
	listeners: Listeners<T>,
	invalidator: Rc<InvalListener>,
	this: Weak<VarBody<T>>,
}

struct VarInner<T> {
	binding: Binding<T>,
	state: State,
	/// Bumped on every binding change.
	generation: u64,
	dependencies: Dependencies,
}

enum Binding<T> {
	Const(T),
	Compute { func: Compute<T>, cached: Option<T> },
	SideEffecting { func: SideEffect<T>, item: T },
	Var { source: Value<T>, cached: Option<T> },
}

enum Pending<T> {
	Compute(Compute<T>),
	SideEffecting(SideEffect<T>, T),
	Var(Value<T>),
}

impl<T> Clone for Var<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Default for Var<T>
where
	T: Default + Clone + 'static,
{
	fn default() -> Self {
		Var::new(Default::default())
	}
}

impl<T> Var<T>
where
	T: Clone + 'static,
{
	pub fn new(value: T) -> Self {
		Var {
			body: VarBody::new(Binding::Const(value)),
		}
	}

	pub fn computed<F>(func: F) -> Self
	where
		F: Fn(&Evaluation) -> T + 'static,
	{
		Var {
			body: VarBody::new(Binding::Compute {
				func: Rc::new(func),
				cached: None,
			}),
		}
	}

	/// # Panics
	///
	/// Panics if the first evaluation fails, see [`ReadOnlyVar::get`].
	pub fn eager_computed<F>(func: F) -> Self
	where
		F: Fn(&Evaluation) -> T + 'static,
	{
		let var = Var::computed(func);
		var.get();
		var
	}

	pub fn new_side_effecting<F>(item: T, func: F) -> Self
	where
		F: Fn(&Evaluation, T) -> T + 'static,
	{
		Var {
			body: VarBody::new(Binding::SideEffecting {
				func: Rc::new(func),
				item,
			}),
		}
	}

	/// A var that mirrors `source`. It subscribes to `source` right away
	/// instead of on the first read.
	pub fn bound_to(source: &impl ReadOnlyVar<T>) -> Self {
		let var = Var {
			body: VarBody::new(Binding::Var {
				source: source.read_only(),
				cached: None,
			}),
		};
		var.body.attach(source);
		var
	}

	/// Labels this var in logs and errors.
	pub fn named(self, name: &'static str) -> Self {
		self.body.name.set(name);
		self
	}

	/// Makes `value` the constant value of this var.
	///
	/// Does nothing if the var already holds an equal constant. Otherwise
	/// the dependencies are dropped and listeners are notified once.
	pub fn set(&self, value: T)
	where
		T: PartialEq,
	{
		self.body.set(value)
	}

	/// Binds this var to `func`. The computation runs on the next read,
	/// not now.
	pub fn bind<F>(&self, func: F)
	where
		F: Fn(&Evaluation) -> T + 'static,
	{
		self.body.rebind(Binding::Compute {
			func: Rc::new(func),
			cached: None,
		})
	}

	/// Binds this var to `func` and evaluates it immediately, so that its
	/// dependencies are registered right away.
	///
	/// # Panics
	///
	/// Panics if the evaluation fails, see [`ReadOnlyVar::get`].
	pub fn eager_bind<F>(&self, func: F) -> T
	where
		F: Fn(&Evaluation) -> T + 'static,
	{
		self.bind(func);
		self.get()
	}

	/// Binds this var directly to `source`, which becomes its only
	/// dependency.
	pub fn bind_to(&self, source: &impl ReadOnlyVar<T>) {
		self.body.rebind(Binding::Var {
			source: source.read_only(),
			cached: None,
		});
		self.body.attach(source);
	}

	/// Starts from `item` and replaces it with the result of `func` on every
	/// recomputation.
	pub fn side_effecting<F>(&self, item: T, func: F)
	where
		F: Fn(&Evaluation, T) -> T + 'static,
	{
		self.body.rebind(Binding::SideEffecting {
			func: Rc::new(func),
			item,
		})
	}

	/// Like [`Var::side_effecting`], starting from the current value.
	pub fn side_effecting_and_retain<F>(&self, func: F)
	where
		F: Fn(&Evaluation, T) -> T + 'static,
	{
		let item = self.get();
		self.side_effecting(item, func)
	}

	/// Sets the value to the result of `func` applied to a copy of the
	/// current one.
	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: PartialEq,
	{
		let mut value = self.get();
		func(&mut value);
		self.set(value)
	}

	pub fn replace(&self, value: T) -> T
	where
		T: PartialEq,
	{
		let old = self.get();
		self.set(value);
		old
	}

	pub fn map<F, R>(&self, func: F) -> Var<R>
	where
		F: Fn(&T) -> R + 'static,
		R: Clone + 'static,
	{
		let this = self.clone();
		Var::computed(move |cx| func(&this.read(cx)))
	}

	pub fn ptr_eq(&self, other: &Var<T>) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}

	pub fn is_stale(&self) -> bool {
		self.body.inner.borrow().state != State::Valid
	}

	/// Number of vars read by the last successful evaluation.
	pub fn dependency_count(&self) -> usize {
		self.body.inner.borrow().dependencies.len()
	}
}

impl<T> VarBody<T>
where
	T: Clone + 'static,
{
	fn new(binding: Binding<T>) -> Rc<Self> {
		let state = match binding {
			Binding::Const(_) => State::Valid,
			_ => State::Invalid,
		};

		Rc::new_cyclic(|this: &Weak<VarBody<T>>| {
			let target: Weak<dyn Observable> = this.clone();
			VarBody {
				name: Cell::new(UNNAMED),
				inner: RefCell::new(VarInner {
					binding,
					state,
					generation: 0,
					dependencies: Dependencies::new(),
				}),
				listeners: Listeners::new(),
				invalidator: Rc::new(InvalListener::new(target)),
				this: this.clone(),
			}
		})
	}

	fn set(&self, value: T)
	where
		T: PartialEq,
	{
		if let Binding::Const(current) = &self.inner.borrow().binding {
			if *current == value {
				return;
			}
		}

		self.rebind(Binding::Const(value))
	}

	fn rebind(&self, binding: Binding<T>) {
		let (previous, dependencies) = {
			let mut inner = self.inner.borrow_mut();
			let inner = &mut *inner;
			inner.dependencies.release(&self.invalidator);
			inner.generation = inner.generation.wrapping_add(1);
			inner.state = State::Invalid;
			(
				std::mem::replace(&mut inner.binding, binding),
				std::mem::take(&mut inner.dependencies),
			)
		};

		// Dropping captured vars must not happen under our own borrow.
		drop(previous);
		drop(dependencies);

		tracing::trace!(name = self.name(), "binding replaced");
		self.notify();
	}

	/// Subscribes to the source of a `Binding::Var` right away.
	fn attach(&self, source: &impl ReadOnlyVar<T>) {
		let mut next = Dependencies::new();
		next.based_on(source.observable());

		let previous = self
			.inner
			.borrow_mut()
			.dependencies
			.swap(next, &self.invalidator);
		drop(previous);
	}

	fn evaluate(&self) -> Result<T, Error> {
		let (pending, generation) = {
			let mut inner = self.inner.borrow_mut();
			let inner = &mut *inner;

			if let State::Evaluating { .. } = inner.state {
				tracing::warn!(name = self.name(), "var was read from its own binding");
				return Err(Error::Cycle { name: self.name() });
			}

			let valid = inner.state == State::Valid;
			let pending = match &inner.binding {
				Binding::Const(value) => {
					inner.state = State::Valid;
					return Ok(value.clone());
				}
				Binding::Compute {
					cached: Some(value),
					..
				}
				| Binding::Var {
					cached: Some(value),
					..
				} if valid => return Ok(value.clone()),
				Binding::SideEffecting { item, .. } if valid => return Ok(item.clone()),
				Binding::Compute { func, .. } => Pending::Compute(func.clone()),
				Binding::SideEffecting { func, item } => Pending::SideEffecting(func.clone(), item.clone()),
				Binding::Var { source, .. } => Pending::Var(source.clone()),
			};

			inner.state = State::Evaluating { invalidated: false };
			(pending, inner.generation)
		};

		tracing::trace!(name = self.name(), "recomputing");

		let mut guard = EvaluationGuard {
			body: self,
			generation,
			armed: true,
		};

		let evaluation = Evaluation::new();
		let value = match pending {
			Pending::Compute(func) => func(&evaluation),
			Pending::SideEffecting(func, item) => func(&evaluation, item),
			Pending::Var(source) => evaluation.read(&source),
		};
		guard.armed = false;

		Ok(self.commit(evaluation.take(), value, generation))
	}

	fn commit(&self, next: Dependencies, value: T, generation: u64) -> T {
		// A dependency read for the first time is not subscribed yet, so a
		// change to it during this evaluation only shows up as staleness.
		let outdated = next.any_stale();

		let (previous, invalidated) = {
			let mut inner = self.inner.borrow_mut();
			let inner = &mut *inner;

			if inner.generation != generation {
				// Rebound while evaluating: the result belongs to a binding
				// that no longer exists.
				tracing::trace!(name = self.name(), "discarding outdated evaluation");
				return value;
			}

			let previous = inner.dependencies.swap(next, &self.invalidator);
			let invalidated = outdated || inner.state == State::Evaluating { invalidated: true };
			inner.state = State::Valid;

			match &mut inner.binding {
				Binding::Compute { cached, .. } | Binding::Var { cached, .. } => {
					*cached = Some(value.clone())
				}
				Binding::SideEffecting { item, .. } => *item = value.clone(),
				Binding::Const(_) => {}
			}

			(previous, invalidated)
		};

		drop(previous);

		// Goes through the regular path so that dependents hear about it.
		if invalidated {
			tracing::trace!(name = self.name(), "dependency changed while evaluating");
			self.invalidate();
		}

		value
	}

	fn notify(&self) {
		if self.listeners.is_empty() {
			return;
		}

		if let Some(this) = self.this.upgrade() {
			self.listeners.notify(&Value::new(this));
		}
	}
}

/// Puts the var back to stale if its binding panics.
struct EvaluationGuard<'a, T>
where
	T: Clone + 'static,
{
	body: &'a VarBody<T>,
	generation: u64,
	armed: bool,
}

impl<'a, T> Drop for EvaluationGuard<'a, T>
where
	T: Clone + 'static,
{
	fn drop(&mut self) {
		if !self.armed {
			return;
		}

		if let Ok(mut inner) = self.body.inner.try_borrow_mut() {
			if inner.generation == self.generation {
				inner.state = State::Invalid;
			}
		}
		tracing::trace!(name = self.body.name(), "evaluation failed, var stays stale");
	}
}

impl<T> Observable for VarBody<T>
where
	T: Clone + 'static,
{
	fn name(&self) -> &'static str {
		self.name.get()
	}

	fn invalidate(&self) {
		let changed = {
			let mut inner = self.inner.borrow_mut();
			match inner.state {
				State::Valid => {
					inner.state = State::Invalid;
					true
				}
				State::Evaluating { .. } => {
					inner.state = State::Evaluating { invalidated: true };
					false
				}
				State::Invalid => false,
			}
		};

		if changed {
			tracing::trace!(name = self.name(), "invalidated");
			self.notify();
		}
	}

	fn subscribe(&self, listener: &Rc<InvalListener>) {
		self.listeners.add(Listener::from(listener.clone()));
	}

	fn unsubscribe(&self, listener: &Rc<InvalListener>) {
		self.listeners.remove(&Listener::from(listener.clone()));
	}

	fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	fn is_stale(&self) -> bool {
		self.inner.borrow().state != State::Valid
	}
}

impl<T> Access<T> for VarBody<T>
where
	T: Clone + 'static,
{
	fn get(&self) -> Result<T, Error> {
		self.evaluate()
	}

	fn add_listener(&self, listener: Listener<T>) {
		self.listeners.add(listener)
	}

	fn remove_listener(&self, listener: &Listener<T>) {
		self.listeners.remove(listener)
	}

	fn as_observable(self: Rc<Self>) -> Rc<dyn Observable> {
		self
	}
}

impl<T> ReadOnlyVar<T> for Var<T>
where
	T: Clone + 'static,
{
	fn access(&self) -> &dyn Access<T> {
		&*self.body
	}

	fn read_only(&self) -> Value<T> {
		Value::new(self.body.clone())
	}

	fn observable(&self) -> Rc<dyn Observable> {
		self.body.clone()
	}

	fn get(&self) -> T {
		match self.body.evaluate() {
			Ok(value) => value,
			Err(err) => panic!("{err}"),
		}
	}
}

impl<T> From<Var<T>> for Value<T>
where
	T: Clone + 'static,
{
	fn from(var: Var<T>) -> Self {
		Value::new(var.body)
	}
}

impl<T> Display for Var<T>
where
	T: Display + Clone + 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.get().fmt(f)
	}
}

impl<T> Debug for Var<T>
where
	T: Clone + 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.body.inner.borrow();
		f.debug_struct("Var")
			.field("name", &self.body.name())
			.field("state", &inner.state)
			.field("dependencies", &inner.dependencies.len())
			.finish()
	}
}
