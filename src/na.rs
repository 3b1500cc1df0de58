//! Missing-value sentinels and NA-safe arithmetic per cell type.
//!
//! Floating point cells use the language NaN as their NA marker; integer
//! cells reserve the type's minimum value. Both are resolved at compile time
//! through trait implementations, so there is no process-wide state.

use std::fmt::Debug;

/// A cell type with a distinguished missing value.
pub trait NaValue: Copy + PartialEq + Default + Debug + Send + Sync + 'static {
    /// The sentinel stored in cells that hold no value.
    fn na() -> Self;

    /// Whether this value is the missing sentinel.
    fn is_na(&self) -> bool;
}

/// Arithmetic used by functors, reducers and compound assignment.
///
/// Integer implementations return NA instead of overflowing or dividing by
/// zero, since the sentinel is the only way to report a failed cell.
pub trait Numeric: NaValue + PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
    fn plus(self, rhs: Self) -> Self;
    fn minus(self, rhs: Self) -> Self;
    fn times(self, rhs: Self) -> Self;
    fn divide(self, rhs: Self) -> Self;
    /// Widening conversion used by statistics reducers. NA maps to NaN.
    fn to_f64(self) -> f64;
}

macro_rules! float_numeric {
    ($($t:ty),*) => {$(
        impl NaValue for $t {
            #[inline]
            fn na() -> Self {
                <$t>::NAN
            }

            #[inline]
            fn is_na(&self) -> bool {
                self.is_nan()
            }
        }

        impl Numeric for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            #[inline]
            fn plus(self, rhs: Self) -> Self { self + rhs }
            #[inline]
            fn minus(self, rhs: Self) -> Self { self - rhs }
            #[inline]
            fn times(self, rhs: Self) -> Self { self * rhs }
            #[inline]
            fn divide(self, rhs: Self) -> Self { self / rhs }
            #[inline]
            fn to_f64(self) -> f64 { self as f64 }
        }
    )*};
}

macro_rules! int_numeric {
    ($($t:ty),*) => {$(
        impl NaValue for $t {
            #[inline]
            fn na() -> Self {
                <$t>::MIN
            }

            #[inline]
            fn is_na(&self) -> bool {
                *self == <$t>::MIN
            }
        }

        impl Numeric for $t {
            fn zero() -> Self { 0 }
            fn one() -> Self { 1 }
            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self.checked_add(rhs).unwrap_or(<$t>::MIN)
            }
            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self.checked_sub(rhs).unwrap_or(<$t>::MIN)
            }
            #[inline]
            fn times(self, rhs: Self) -> Self {
                self.checked_mul(rhs).unwrap_or(<$t>::MIN)
            }
            #[inline]
            fn divide(self, rhs: Self) -> Self {
                self.checked_div(rhs).unwrap_or(<$t>::MIN)
            }
            #[inline]
            fn to_f64(self) -> f64 {
                if self.is_na() { f64::NAN } else { self as f64 }
            }
        }
    )*};
}

float_numeric!(f32, f64);
int_numeric!(i32, i64);

/// Returns NA when either operand is NA, otherwise `op(lhs, rhs)`.
#[inline]
pub fn na_guard<X, Y, R, F>(lhs: X, rhs: Y, op: F) -> R
where
    X: NaValue,
    Y: NaValue,
    R: NaValue,
    F: FnOnce(X, Y) -> R,
{
    if lhs.is_na() || rhs.is_na() {
        R::na()
    } else {
        op(lhs, rhs)
    }
}
