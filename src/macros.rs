pub use enclose::*;

/// Builds a computed [`Var`](crate::Var), cloning the listed captures into
/// the binding.
///
/// ```
/// use varbind::{computed, ReadOnlyVar, Var};
///
/// let a = Var::new(1);
/// let doubled = computed!((a) cx => a.read(cx) * 2);
/// assert_eq!(doubled.get(), 2);
/// ```
#[macro_export]
macro_rules! computed {
    (( $($d_tt:tt)* ) $cx:ident => $($b:tt)*) => {
        $crate::Var::computed($crate::macros::enclose!(($( $d_tt )*) move |$cx: &$crate::Evaluation| { $($b)* }))
    };
    ($cx:ident => $($b:tt)*) => {
        $crate::Var::computed(move |$cx: &$crate::Evaluation| { $($b)* })
    };
}

#[macro_export]
macro_rules! side_effecting {
    (( $($d_tt:tt)* ) $item:expr, $cx:ident, $prev:ident => $($b:tt)*) => {
        $crate::Var::new_side_effecting($item, $crate::macros::enclose!(($( $d_tt )*) move |$cx: &$crate::Evaluation, $prev| { $($b)* }))
    };
    ($item:expr, $cx:ident, $prev:ident => $($b:tt)*) => {
        $crate::Var::new_side_effecting($item, move |$cx: &$crate::Evaluation, $prev| { $($b)* })
    };
}
