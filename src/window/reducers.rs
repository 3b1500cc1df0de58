//! Built-in window reducers.
//!
//! Unless stated otherwise a single NA cell in the window makes the result NA.

use super::Reducer;
use crate::na::{NaValue, Numeric};

fn any_na<V: NaValue>(window: &[V]) -> bool {
    window.iter().any(NaValue::is_na)
}

/// Sum of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<V: Numeric> Reducer<V> for Sum {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        let mut total = V::zero();
        for &value in window {
            if value.is_na() {
                return V::na();
            }
            total = total.plus(value);
        }
        total
    }
}

/// Product of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prod;

impl<V: Numeric> Reducer<V> for Prod {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        let mut total = V::one();
        for &value in window {
            if value.is_na() {
                return V::na();
            }
            total = total.times(value);
        }
        total
    }
}

/// Arithmetic mean as `f64`. An empty window is NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl<V: Numeric> Reducer<V> for Mean {
    type Output = f64;

    fn apply(&mut self, window: &[V]) -> f64 {
        if window.is_empty() || any_na(window) {
            return f64::na();
        }
        window.iter().map(|v| v.to_f64()).sum::<f64>() / window.len() as f64
    }
}

/// Smallest value of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl<V: Numeric> Reducer<V> for Min {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        extreme(window, |candidate, best| candidate < best)
    }
}

/// Largest value of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl<V: Numeric> Reducer<V> for Max {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        extreme(window, |candidate, best| candidate > best)
    }
}

fn extreme<V: Numeric>(window: &[V], better: impl Fn(V, V) -> bool) -> V {
    let mut iter = window.iter().copied();
    let mut best = match iter.next() {
        Some(first) if !first.is_na() => first,
        _ => return V::na(),
    };
    for value in iter {
        if value.is_na() {
            return V::na();
        }
        if better(value, best) {
            best = value;
        }
    }
    best
}

/// Sample standard deviation (`n - 1` denominator) as `f64`.
///
/// Fewer than two values give NA.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDev;

impl<V: Numeric> Reducer<V> for StdDev {
    type Output = f64;

    fn apply(&mut self, window: &[V]) -> f64 {
        if window.len() < 2 || any_na(window) {
            return f64::na();
        }
        let n = window.len() as f64;
        let mean = window.iter().map(|v| v.to_f64()).sum::<f64>() / n;
        let sum_squared_diff: f64 = window
            .iter()
            .map(|v| (v.to_f64() - mean).powi(2))
            .sum();
        (sum_squared_diff / (n - 1.0)).sqrt()
    }
}

/// First cell of the window, NA or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl<V: NaValue> Reducer<V> for First {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        window.first().copied().unwrap_or_else(V::na)
    }
}

/// Last cell of the window, NA or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct Last;

impl<V: NaValue> Reducer<V> for Last {
    type Output = V;

    fn apply(&mut self, window: &[V]) -> V {
        window.last().copied().unwrap_or_else(V::na)
    }
}

/// Number of non-NA cells. Never NA itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl<V: NaValue> Reducer<V> for Count {
    type Output = i64;

    fn apply(&mut self, window: &[V]) -> i64 {
        window.iter().filter(|v| !v.is_na()).count() as i64
    }
}
