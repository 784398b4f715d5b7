//! Names for the primitive instantiations.
//!
//! `get` returns `T` by value, so these vars never box their value.

use crate::{Value, Var};

pub type BooleanVar = Var<bool>;
pub type IntVar = Var<i32>;
pub type LongVar = Var<i64>;
pub type FloatVar = Var<f32>;
pub type DoubleVar = Var<f64>;
pub type CharVar = Var<char>;

pub type ReadOnlyBooleanVar = Value<bool>;
pub type ReadOnlyIntVar = Value<i32>;
pub type ReadOnlyLongVar = Value<i64>;
pub type ReadOnlyFloatVar = Value<f32>;
pub type ReadOnlyDoubleVar = Value<f64>;
pub type ReadOnlyCharVar = Value<char>;
