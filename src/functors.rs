//! Elementwise binary functors over two possibly different cell types.
//!
//! The result type of a mixed operation comes from [`Promote`]: integers
//! widen to the larger integer, anything mixed with a float becomes that
//! float (`f64` wins over `f32`).

use crate::na::{NaValue, Numeric};

/// Common result type of `Self` combined with `Rhs`.
pub trait Promote<Rhs: NaValue>: NaValue {
    type Output: Numeric;

    fn promote_lhs(self) -> Self::Output;
    fn promote_rhs(rhs: Rhs) -> Self::Output;
}

macro_rules! promote {
    ($($lhs:ty, $rhs:ty => $out:ty);* $(;)?) => {$(
        impl Promote<$rhs> for $lhs {
            type Output = $out;

            #[inline]
            fn promote_lhs(self) -> $out {
                if self.is_na() { <$out>::na() } else { self as $out }
            }

            #[inline]
            fn promote_rhs(rhs: $rhs) -> $out {
                if rhs.is_na() { <$out>::na() } else { rhs as $out }
            }
        }
    )*};
}

promote! {
    f64, f64 => f64;
    f32, f32 => f32;
    i32, i32 => i32;
    i64, i64 => i64;
    f64, f32 => f64;
    f32, f64 => f64;
    i32, i64 => i64;
    i64, i32 => i64;
    f64, i32 => f64;
    i32, f64 => f64;
    f64, i64 => f64;
    i64, f64 => f64;
    f32, i32 => f32;
    i32, f32 => f32;
}

/// A binary cell operation. Callers screen NA operands before `apply`.
pub trait BinaryFunctor<X, Y> {
    type Output: NaValue;

    fn apply(&self, x: X, y: Y) -> Self::Output;
}

/// Addition, `x + y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plus;

/// Subtraction, `x - y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minus;

/// Multiplication, `x * y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

/// Division, `x / y`. Integer division by zero yields NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct Divide;

macro_rules! arithmetic_functor {
    ($name:ident, $method:ident) => {
        impl<X, Y> BinaryFunctor<X, Y> for $name
        where
            X: Promote<Y>,
            Y: NaValue,
        {
            type Output = <X as Promote<Y>>::Output;

            #[inline]
            fn apply(&self, x: X, y: Y) -> Self::Output {
                x.promote_lhs().$method(X::promote_rhs(y))
            }
        }
    };
}

arithmetic_functor!(Plus, plus);
arithmetic_functor!(Minus, minus);
arithmetic_functor!(Multiply, times);
arithmetic_functor!(Divide, divide);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_type_arithmetic() {
        assert_eq!(Plus.apply(1.5f64, 2.0f64), 3.5);
        assert_eq!(Minus.apply(10i32, 4i32), 6);
        assert_eq!(Multiply.apply(3i64, 4i64), 12);
        assert_eq!(Divide.apply(9.0f64, 3.0f64), 3.0);
    }

    #[test]
    fn mixed_types_promote_to_float() {
        let out: f64 = Plus.apply(2i32, 0.5f64);
        assert_eq!(out, 2.5);
        let out: f64 = Divide.apply(1.0f64, 4i32);
        assert_eq!(out, 0.25);
    }

    #[test]
    fn mixed_integers_widen() {
        let out: i64 = Multiply.apply(i32::MAX, 2i64);
        assert_eq!(out, i32::MAX as i64 * 2);
    }

    #[test]
    fn promotion_preserves_na() {
        assert!(<i32 as Promote<f64>>::promote_lhs(i32::na()).is_nan());
        assert!(<f64 as Promote<i32>>::promote_rhs(i32::na()).is_nan());
    }

    #[test]
    fn integer_divide_by_zero_is_na() {
        assert!(Divide.apply(5i32, 0i32).is_na());
    }
}
