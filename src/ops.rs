use crate::{Const, ReadOnlyVar, Var};

pub trait Toggle {
	fn toggle(&mut self);
}

impl Toggle for bool {
	fn toggle(&mut self) {
		*self = !*self
	}
}

impl<T> Var<T>
where
	T: Toggle + Clone + PartialEq + 'static,
{
	#[inline]
	pub fn toggle(&self) {
		self.update(T::toggle)
	}
}

impl Var<bool> {
	/// Sets this var to the negation of its current value and returns the
	/// new state.
	pub fn invert(&self) -> bool {
		let next = !self.get();
		self.set(next);
		next
	}
}

/// Arithmetic used by the increment and decrement helpers.
///
/// Integer arithmetic wraps on overflow.
pub trait Numeric: Copy + PartialEq + 'static {
	const ONE: Self;

	fn plus(self, rhs: Self) -> Self;
	fn minus(self, rhs: Self) -> Self;
	fn negated(self) -> Self;
}

macro_rules! integer {
	($($ty:ty),*) => {$(
		impl Numeric for $ty {
			const ONE: Self = 1;

			fn plus(self, rhs: Self) -> Self {
				self.wrapping_add(rhs)
			}

			fn minus(self, rhs: Self) -> Self {
				self.wrapping_sub(rhs)
			}

			fn negated(self) -> Self {
				self.wrapping_neg()
			}
		}
	)*};
}

macro_rules! float {
	($($ty:ty),*) => {$(
		impl Numeric for $ty {
			const ONE: Self = 1.0;

			fn plus(self, rhs: Self) -> Self {
				self + rhs
			}

			fn minus(self, rhs: Self) -> Self {
				self - rhs
			}

			fn negated(self) -> Self {
				-self
			}
		}
	)*};
}

integer!(i8, i16, i32, i64, isize);
float!(f32, f64);

impl<T> Var<T>
where
	T: Numeric,
{
	/// Sets this var to the negation of its current value and returns the
	/// new state.
	pub fn negate(&self) -> T {
		let next = self.get().negated();
		self.set(next);
		next
	}

	/// Increments by one and returns the previous value.
	pub fn get_and_increment(&self) -> T {
		self.get_and_increment_by(T::ONE)
	}

	/// Increments by one and returns the new value.
	pub fn increment_and_get(&self) -> T {
		self.increment_and_get_by(T::ONE)
	}

	pub fn get_and_increment_by(&self, amount: T) -> T {
		let old = self.get();
		self.set(old.plus(amount));
		old
	}

	pub fn increment_and_get_by(&self, amount: T) -> T {
		let next = self.get().plus(amount);
		self.set(next);
		next
	}

	/// Decrements by one and returns the previous value.
	pub fn get_and_decrement(&self) -> T {
		self.get_and_decrement_by(T::ONE)
	}

	/// Decrements by one and returns the new value.
	pub fn decrement_and_get(&self) -> T {
		self.decrement_and_get_by(T::ONE)
	}

	pub fn get_and_decrement_by(&self, amount: T) -> T {
		let old = self.get();
		self.set(old.minus(amount));
		old
	}

	pub fn decrement_and_get_by(&self, amount: T) -> T {
		let next = self.get().minus(amount);
		self.set(next);
		next
	}
}

pub trait ToConstVar: Sized {
	/// Wraps `self` in a [`Const`].
	fn to_const_var(self) -> Const<Self>;
}

impl<T> ToConstVar for T
where
	T: Clone + 'static,
{
	fn to_const_var(self) -> Const<T> {
		Const::new(self)
	}
}
