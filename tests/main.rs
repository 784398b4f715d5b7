use std::cell::{Cell, RefCell};
use std::rc::Rc;

use varbind::macros::enclose;
use varbind::{computed, constant, side_effecting, Listener, ReadOnlyVar, Var};


use mock::Spy;

fn counting(mock: &mock::SharedMock) -> Listener<i32> {
	let mock = mock.clone();
	Listener::new(move |_| {
		mock.get().trigger(0);
	})
}

#[test]
fn computed_follows_its_dependency() {
	mock::trace();

	let a = Var::new(10);
	assert_eq!(a.get(), 10);

	let b = computed(enclose!((a) move |cx| cx.read(&a) + 10));
	assert_eq!(b.get(), 20);

	a.set(20);
	assert_eq!(b.get(), 30);
}

#[test]
fn set_stores_a_value() {
	let var = Var::new(0);
	var.set(42);
	assert_eq!(var.get(), 42);
}

#[test]
fn set_with_equal_constant_does_not_notify() {
	let var = constant(false);
	let fired = Rc::new(Cell::new(0));
	var.add_listener(Listener::new(enclose!((fired) move |_| fired.set(fired.get() + 1))));

	var.set(false);
	assert_eq!(fired.get(), 0);

	var.set(true);
	assert_eq!(fired.get(), 1);

	var.set(true);
	assert_eq!(fired.get(), 1);
}

#[test]
fn set_on_a_computed_var_always_notifies() {
	let var = computed(|_| 5);
	assert_eq!(var.get(), 5);

	let mock = mock::SharedMock::new();
	var.add_listener(counting(&mock));

	mock.get().expect_trigger().times(1).return_const(());
	var.set(5);
	mock.get().checkpoint();

	assert_eq!(var.get(), 5);
}

#[test]
fn invalidation_notifies_listeners_only_once() {
	let var = Var::new(0);
	var.bind(|_| 7);

	let mock = mock::SharedMock::new();
	var.add_listener(counting(&mock));

	mock.get().expect_trigger().times(1).return_const(());
	assert_eq!(var.get(), 7);
	var.invalidate();
	var.invalidate();
	mock.get().checkpoint();
}

#[test]
fn invalidating_a_stale_var_does_nothing() {
	let var = computed(|_| 1);
	let fired = Rc::new(Cell::new(0));
	var.add_listener(Listener::new(enclose!((fired) move |_| fired.set(fired.get() + 1))));

	// Never read, so still stale.
	var.invalidate();
	assert_eq!(fired.get(), 0);
}

#[test]
fn bind_is_lazy_and_cached() {
	let source = Var::new(1);
	let calls = Rc::new(Cell::new(0));

	let var = Var::new(0);
	var.bind(enclose!((source, calls) move |cx| {
		calls.set(calls.get() + 1);
		cx.read(&source) * 3
	}));
	assert_eq!(calls.get(), 0);

	assert_eq!(var.get(), 3);
	assert_eq!(var.get(), 3);
	assert_eq!(calls.get(), 1);

	// Invalidation alone does not recompute.
	source.invalidate();
	source.set(2);
	assert_eq!(calls.get(), 1);

	assert_eq!(var.get(), 6);
	assert_eq!(calls.get(), 2);
}

#[test]
fn bind_does_not_evaluate_but_notifies() {
	let var = Var::new(1);
	let mock = mock::SharedMock::new();
	let calls = Rc::new(Cell::new(0));

	var.add_listener(counting(&mock));

	mock.get().expect_trigger().times(1).return_const(());
	var.bind(enclose!((calls) move |_| {
		calls.set(calls.get() + 1);
		2
	}));
	mock.get().checkpoint();

	assert_eq!(calls.get(), 0);
	assert_eq!(var.get(), 2);
	assert_eq!(calls.get(), 1);
}

#[test]
fn eager_bind_registers_dependencies_immediately() {
	let source = Var::new(4);
	let var = Var::new(0);

	let value = var.eager_bind(enclose!((source) move |cx| cx.read(&source) + 1));

	assert_eq!(value, 5);
	assert_eq!(source.listener_count(), 1);
	assert!(!var.is_stale());
}

#[test]
fn eager_computed_registers_dependencies_immediately() {
	let source = Var::new(4);
	let var = varbind::eager_computed(enclose!((source) move |cx| cx.read(&source)));

	assert_eq!(source.listener_count(), 1);
	assert_eq!(var.dependency_count(), 1);
}

#[test]
fn rebinding_moves_the_subscription() {
	let a = Var::new(1);
	let b = Var::new(2);
	let var = computed(enclose!((a) move |cx| cx.read(&a)));

	assert_eq!(var.get(), 1);
	assert_eq!(a.listener_count(), 1);
	assert_eq!(b.listener_count(), 0);

	var.bind(enclose!((b) move |cx| cx.read(&b)));
	assert_eq!(a.listener_count(), 0);
	assert_eq!(b.listener_count(), 0);

	assert_eq!(var.get(), 2);
	assert_eq!(var.get(), 2);
	assert_eq!(a.listener_count(), 0);
	assert_eq!(b.listener_count(), 1);

	// The old dependency no longer affects the var.
	a.set(10);
	assert!(!var.is_stale());
}

#[test]
fn dependencies_follow_the_last_evaluation() {
	let flag = Var::new(true);
	let a = Var::new(1);
	let b = Var::new(2);
	let var = computed(enclose!((flag, a, b) move |cx| {
		if cx.read(&flag) {
			cx.read(&a)
		} else {
			cx.read(&b)
		}
	}));

	assert_eq!(var.get(), 1);
	assert_eq!(var.dependency_count(), 2);
	assert_eq!(a.listener_count(), 1);
	assert_eq!(b.listener_count(), 0);

	flag.set(false);
	assert_eq!(var.get(), 2);
	assert_eq!(var.dependency_count(), 2);
	assert_eq!(a.listener_count(), 0);
	assert_eq!(b.listener_count(), 1);
	assert_eq!(flag.listener_count(), 1);
}

#[test]
fn set_drops_dependencies() {
	let a = Var::new(1);
	let var = computed(enclose!((a) move |cx| cx.read(&a)));
	var.get();
	assert_eq!(a.listener_count(), 1);

	var.set(3);
	assert_eq!(a.listener_count(), 0);
	assert_eq!(var.dependency_count(), 0);
	assert_eq!(var.get(), 3);
}

#[test]
fn reading_twice_records_one_dependency() {
	let a = Var::new(1);
	let counted = Rc::new(Cell::new(0));
	let var = computed(enclose!((a, counted) move |cx| {
		let value = cx.read(&a) + a.read(cx);
		counted.set(cx.dependency_count());
		value
	}));

	assert_eq!(var.get(), 2);
	assert_eq!(counted.get(), 1);
	assert_eq!(a.listener_count(), 1);
}

#[test]
fn side_effecting_passes_the_retained_value() {
	let a = Var::new(1);
	let seen = Rc::new(RefCell::new(Vec::new()));

	let var = side_effecting(
		Vec::<i32>::new(),
		enclose!((a, seen) move |cx, mut item: Vec<i32>| {
			seen.borrow_mut().push(item.len());
			item.push(cx.read(&a));
			item
		}),
	);

	assert_eq!(var.get(), vec![1]);
	assert_eq!(var.get(), vec![1]);

	a.set(2);
	assert_eq!(var.get(), vec![1, 2]);
	assert_eq!(*seen.borrow(), vec![0, 1]);
}

#[test]
fn side_effecting_is_lazy() {
	let trigger = Var::new(0);
	let calls = Rc::new(Cell::new(0));
	let var = Var::new(0);

	var.side_effecting(10, enclose!((trigger, calls) move |cx, item| {
		calls.set(calls.get() + 1);
		cx.read(&trigger);
		item + 1
	}));

	assert_eq!(calls.get(), 0);
	assert_eq!(var.get(), 11);
	assert_eq!(var.get(), 11);
	assert_eq!(calls.get(), 1);

	trigger.invalidate();
	trigger.set(1);
	assert_eq!(calls.get(), 1);
	assert_eq!(var.get(), 12);
	assert_eq!(calls.get(), 2);
}

#[test]
fn side_effecting_and_retain_starts_from_the_current_value() {
	let var = Var::new(5);
	var.side_effecting_and_retain(|_, item| item * 2);
	assert_eq!(var.get(), 10);
}

#[test]
fn side_effecting_macro_captures_its_dependencies() {
	let step = Var::new(2);
	let var = varbind::side_effecting!((step) 0, cx, total => total + step.read(cx));

	assert_eq!(var.get(), 2);
	step.set(3);
	assert_eq!(var.get(), 5);
}

#[test]
fn computed_macro_captures_its_dependencies() {
	let a = Var::new(2);
	let b = Var::new(3);
	let sum = varbind::computed!((a, b) cx => a.read(cx) + b.read(cx));

	assert_eq!(sum.get(), 5);
	b.set(4);
	assert_eq!(sum.get(), 6);
}

#[test]
fn chains_resolve_depth_first() {
	let a = Var::new(1).named("a");
	let b = computed(enclose!((a) move |cx| cx.read(&a) + 1)).named("b");
	let c = computed(enclose!((b) move |cx| cx.read(&b) * 10)).named("c");

	assert_eq!(c.get(), 20);

	a.set(5);
	assert!(b.is_stale());
	assert!(c.is_stale());
	assert_eq!(c.get(), 60);
	assert!(!b.is_stale());
}

#[test]
fn invalidation_reaches_dependents_once() {
	let a = Var::new(1);
	let b = computed(enclose!((a) move |cx| cx.read(&a)));
	let c = computed(enclose!((a, b) move |cx| cx.read(&a) + cx.read(&b)));

	let fired = Rc::new(Cell::new(0));
	c.add_listener(Listener::new(enclose!((fired) move |_| fired.set(fired.get() + 1))));

	assert_eq!(c.get(), 2);
	a.set(2);
	assert_eq!(fired.get(), 1);
	assert_eq!(c.get(), 4);
}

#[test]
fn get_is_idempotent() {
	let a = Var::new(String::from("left"));
	let calls = Rc::new(Cell::new(0));
	let var = computed(enclose!((a, calls) move |cx| {
		calls.set(calls.get() + 1);
		format!("{}!", cx.read(&a))
	}));

	assert_eq!(var.get(), var.get());
	assert_eq!(calls.get(), 1);
}

#[test]
fn notifications_do_not_depend_on_value_changes() {
	let a = Var::new(1);
	let parity = computed(enclose!((a) move |cx| cx.read(&a) % 2));
	let fired = Rc::new(Cell::new(0));
	parity.add_listener(Listener::new(enclose!((fired) move |_| fired.set(fired.get() + 1))));

	assert_eq!(parity.get(), 1);
	a.set(3);
	assert_eq!(fired.get(), 1);
	assert_eq!(parity.get(), 1);
	assert_eq!(fired.get(), 1);
}

#[test]
fn bound_to_subscribes_immediately() {
	let source = Var::new(3);
	let mirror = Var::bound_to(&source);

	assert_eq!(source.listener_count(), 1);
	assert_eq!(mirror.get(), 3);

	source.set(4);
	assert!(mirror.is_stale());
	assert_eq!(mirror.get(), 4);
	assert_eq!(source.listener_count(), 1);
}

#[test]
fn bind_to_a_computed_var() {
	let flag = Rc::new(Cell::new(false));
	let other = computed(enclose!((flag) move |_| {
		flag.set(true);
		8
	}));

	let var = Var::new(1);
	var.bind_to(&other);

	assert_eq!(var.get(), 8);
	assert!(flag.get());
	assert_eq!(var.get(), 8);
	assert_eq!(var.dependency_count(), 1);
}

#[test]
fn map_derives_a_var() {
	let name = Var::new(String::from("cell"));
	let length = name.map(|name| name.len());

	assert_eq!(length.get(), 4);
	name.set(String::from("widget"));
	assert_eq!(length.get(), 6);
}

#[test]
fn display_and_debug() {
	let var = Var::new(12).named("width");
	assert_eq!(var.to_string(), "12");

	let debug = format!("{:?}", var);
	assert!(debug.contains("width"));
}
