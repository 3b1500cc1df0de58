//! Column-wise transforms that keep the row count.
//!
//! A transform reads one whole column and writes a column of the same
//! length, possibly of another cell type. [`ColumnTransformWith`] takes one
//! extra scalar argument.

use crate::na::{NaValue, Numeric};

/// Maps one input column onto an output column of the same length.
pub trait ColumnTransform<V> {
    type Output: NaValue;

    /// `output.len() == input.len()` is guaranteed by the caller.
    fn apply(&self, input: &[V], output: &mut [Self::Output]);
}

/// A column transform parameterized by one extra argument.
pub trait ColumnTransformWith<V, A> {
    type Output: NaValue;

    fn apply(&self, input: &[V], output: &mut [Self::Output], arg: A);
}

/// Running sum. Once an NA is seen, every later cell is NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct CumSum;

impl<V: Numeric> ColumnTransform<V> for CumSum {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        let mut total = V::zero();
        for (out, &value) in output.iter_mut().zip(input) {
            total = if total.is_na() || value.is_na() {
                V::na()
            } else {
                total.plus(value)
            };
            *out = total;
        }
    }
}

/// Running product with the same NA rule as [`CumSum`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CumProd;

impl<V: Numeric> ColumnTransform<V> for CumProd {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        let mut total = V::one();
        for (out, &value) in output.iter_mut().zip(input) {
            total = if total.is_na() || value.is_na() {
                V::na()
            } else {
                total.times(value)
            };
            *out = total;
        }
    }
}

/// Replaces NA with the most recent non-NA value. Leading NAs stay NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillForward;

impl<V: NaValue> ColumnTransform<V> for FillForward {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        let mut last = V::na();
        for (out, &value) in output.iter_mut().zip(input) {
            if !value.is_na() {
                last = value;
            }
            *out = last;
        }
    }
}

/// Replaces NA with the next non-NA value. Trailing NAs stay NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillBackward;

impl<V: NaValue> ColumnTransform<V> for FillBackward {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        let mut next = V::na();
        for (out, &value) in output.iter_mut().zip(input).rev() {
            if !value.is_na() {
                next = value;
            }
            *out = next;
        }
    }
}

/// Rows elapsed since the most recent NA (0 on the NA row itself).
///
/// Rows before the first NA have no reference point and are NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinceNa;

impl<V: NaValue> ColumnTransform<V> for SinceNa {
    type Output = i64;

    fn apply(&self, input: &[V], output: &mut [i64]) {
        let mut since: Option<i64> = None;
        for (out, value) in output.iter_mut().zip(input) {
            since = if value.is_na() {
                Some(0)
            } else {
                since.map(|n| n + 1)
            };
            *out = since.unwrap_or_else(i64::na);
        }
    }
}

/// Running maximum. NA cells are NA in the output and skipped otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandingMax;

impl<V: Numeric> ColumnTransform<V> for ExpandingMax {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        expanding(input, output, |candidate, best| candidate > best);
    }
}

/// Running minimum with the same NA rule as [`ExpandingMax`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandingMin;

impl<V: Numeric> ColumnTransform<V> for ExpandingMin {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V]) {
        expanding(input, output, |candidate, best| candidate < best);
    }
}

fn expanding<V: Numeric>(input: &[V], output: &mut [V], better: impl Fn(V, V) -> bool) {
    let mut best: Option<V> = None;
    for (out, &value) in output.iter_mut().zip(input) {
        if value.is_na() {
            *out = V::na();
            continue;
        }
        let current = match best {
            Some(b) if !better(value, b) => b,
            _ => value,
        };
        best = Some(current);
        *out = current;
    }
}

/// Replaces NA cells with the argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillValue;

impl<V: NaValue> ColumnTransformWith<V, V> for FillValue {
    type Output = V;

    fn apply(&self, input: &[V], output: &mut [V], arg: V) {
        for (out, &value) in output.iter_mut().zip(input) {
            *out = if value.is_na() { arg } else { value };
        }
    }
}

/// Computes the next value for an exponential smoothing step.
pub fn ema_step(previous: Option<f64>, value: f64, lambda: f64) -> f64 {
    match previous {
        Some(prev) => lambda * value + (1.0 - lambda) * prev,
        None => value,
    }
}

/// Exponential moving average over `periods` rows (`alpha = 2 / (periods + 1)`).
///
/// NA cells produce NA and leave the running average untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ema;

impl<V: Numeric> ColumnTransformWith<V, usize> for Ema {
    type Output = f64;

    fn apply(&self, input: &[V], output: &mut [f64], periods: usize) {
        let lambda = 2.0 / (periods as f64 + 1.0);
        let mut previous: Option<f64> = None;
        for (out, &value) in output.iter_mut().zip(input) {
            if value.is_na() {
                *out = f64::na();
                continue;
            }
            let next = ema_step(previous, value.to_f64(), lambda);
            previous = Some(next);
            *out = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<V, T: ColumnTransform<V>>(t: T, input: &[V]) -> Vec<T::Output> {
        let mut out = vec![T::Output::default(); input.len()];
        t.apply(input, &mut out);
        out
    }

    #[test]
    fn cumsum_propagates_na_forward() {
        assert_eq!(run(CumSum, &[1, 2, 3]), vec![1, 3, 6]);
        let out = run(CumSum, &[1.0, f64::NAN, 3.0]);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan() && out[2].is_nan());
    }

    #[test]
    fn cumprod_multiplies() {
        assert_eq!(run(CumProd, &[2.0, 3.0, 4.0]), vec![2.0, 6.0, 24.0]);
    }

    #[test]
    fn fill_forward_and_backward() {
        let na = f64::NAN;
        let ff = run(FillForward, &[na, 1.0, na, na, 4.0]);
        assert!(ff[0].is_nan());
        assert_eq!(&ff[1..], &[1.0, 1.0, 1.0, 4.0]);

        let fb = run(FillBackward, &[na, 1.0, na, 4.0, na]);
        assert_eq!(&fb[..4], &[1.0, 1.0, 4.0, 4.0]);
        assert!(fb[4].is_nan());
    }

    #[test]
    fn since_na_counts_rows() {
        let na = i32::MIN;
        let out = run(SinceNa, &[1, na, 2, 3, na, 4]);
        assert!(out[0].is_na());
        assert_eq!(&out[1..], &[0, 1, 2, 0, 1]);
    }

    #[test]
    fn expanding_extremes_skip_na() {
        let out = run(ExpandingMax, &[1.0, 3.0, f64::NAN, 2.0, 5.0]);
        assert_eq!(out[..2], [1.0, 3.0]);
        assert!(out[2].is_nan());
        assert_eq!(out[3..], [3.0, 5.0]);
        assert_eq!(run(ExpandingMin, &[4, 2, 3, 1]), vec![4, 2, 2, 1]);
    }

    #[test]
    fn fill_value_replaces_na() {
        let mut out = vec![0.0; 3];
        FillValue.apply(&[1.0, f64::NAN, 3.0], &mut out, 0.5);
        assert_eq!(out, vec![1.0, 0.5, 3.0]);
    }

    #[test]
    fn ema_seeds_with_first_value() {
        let mut out = vec![0.0; 3];
        Ema.apply(&[10.0, 20.0, 40.0], &mut out, 3);
        assert_eq!(out[0], 10.0);
        assert!((out[1] - 15.0).abs() < 1e-12);
        assert!((out[2] - 27.5).abs() < 1e-12);
    }

    #[test]
    fn ema_step_weights_new_value_and_previous() {
        assert_eq!(ema_step(None, 42.0, 0.5), 42.0);
        let second = ema_step(Some(100.0), 110.0, 0.1);
        assert!((second - (0.1 * 110.0 + 0.9 * 100.0)).abs() < 1e-12);
    }
}
