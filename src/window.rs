//! Rolling-window execution over a single column.
//!
//! A [`Reducer`] turns a contiguous slice of cells into one value;
//! [`FixedWindow`] slides it across a column. Any
//! `FnMut(&[V]) -> O` closure is a reducer, and `reducers` ships the
//! common aggregations.

pub mod reducers;

use crate::error::SeriesError;
use crate::na::NaValue;

/// Maps a contiguous range of cells to a single result cell.
///
/// `apply` takes `&mut self` so a reducer may carry running state across
/// consecutive windows of one column. The engine hands every column its
/// own clone.
pub trait Reducer<V> {
    type Output: NaValue;

    fn apply(&mut self, window: &[V]) -> Self::Output;
}

impl<V, O, F> Reducer<V> for F
where
    F: FnMut(&[V]) -> O,
    O: NaValue,
{
    type Output = O;

    fn apply(&mut self, window: &[V]) -> O {
        self(window)
    }
}

/// Common behavior shared by windowing strategies.
pub trait WindowStrategy {
    /// Number of leading rows that produce no output.
    fn burn_in(&self) -> usize;
}

/// Fixed-size sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindow {
    size: usize,
}

impl FixedWindow {
    /// Creates a window of `size` rows over a column of `nrow` rows.
    ///
    /// # Errors
    /// Returns `InvalidWindow` unless `1 <= size <= nrow`.
    pub fn new(size: usize, nrow: usize) -> Result<Self, SeriesError> {
        if size == 0 || size > nrow {
            return Err(SeriesError::InvalidWindow { window: size, nrow });
        }
        Ok(FixedWindow { size })
    }

    /// Number of outputs produced for a column of `nrow` rows.
    pub fn output_len(&self, nrow: usize) -> usize {
        nrow + 1 - self.size
    }

    /// Writes `reducer(data[k..k + size])` into `out[k]` for every full window.
    ///
    /// `out` must hold exactly [`output_len`](Self::output_len) cells.
    pub fn apply_into<V, R>(&self, data: &[V], reducer: &mut R, out: &mut [R::Output])
    where
        R: Reducer<V>,
    {
        debug_assert_eq!(out.len(), self.output_len(data.len()));
        for (slot, window) in out.iter_mut().zip(data.windows(self.size)) {
            *slot = reducer.apply(window);
        }
    }
}

impl WindowStrategy for FixedWindow {
    fn burn_in(&self) -> usize {
        self.size - 1
    }
}

/// Slides `reducer` over `column`, writing `column.len() - (window - 1)` cells
/// into `out`.
///
/// # Errors
/// Returns `InvalidWindow` unless `1 <= window <= column.len()`.
pub fn window_apply<V, R>(
    column: &[V],
    window: usize,
    reducer: &mut R,
    out: &mut [R::Output],
) -> Result<(), SeriesError>
where
    R: Reducer<V>,
{
    let fixed = FixedWindow::new(window, column.len())?;
    fixed.apply_into(column, reducer, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::reducers::Sum;
    use super::*;

    #[test]
    fn fixed_window_sums_full_windows() {
        let window = FixedWindow::new(3, 5).unwrap();
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut out = vec![0.0; 3];
        window_apply(&data, 3, &mut Sum, &mut out).unwrap();
        assert_eq!(out, vec![6.0, 9.0, 12.0]);
        assert_eq!(window.burn_in(), 2);
        assert_eq!(window.output_len(5), 3);
    }

    #[test]
    fn closures_are_reducers() {
        let data = vec![1.0, 4.0, 9.0, 16.0];
        let mut spread = vec![0.0; 3];
        window_apply(&data, 2, &mut |slice: &[f64]| slice[1] - slice[0], &mut spread).unwrap();
        assert_eq!(spread, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn stateful_reducer_sees_windows_in_order() {
        let mut calls = 0i64;
        let mut scaled = |slice: &[i64]| {
            calls += 1;
            slice[0] * calls
        };
        let mut out = vec![0i64; 3];
        window_apply(&[5i64, 6, 7], 1, &mut scaled, &mut out).unwrap();
        assert_eq!(out, vec![5, 12, 21]);
    }

    #[test]
    fn window_size_must_fit_column() {
        assert_eq!(
            FixedWindow::new(0, 3).unwrap_err(),
            SeriesError::InvalidWindow { window: 0, nrow: 3 }
        );
        assert_eq!(
            FixedWindow::new(4, 3).unwrap_err(),
            SeriesError::InvalidWindow { window: 4, nrow: 3 }
        );
        assert!(FixedWindow::new(3, 3).is_ok());
    }

    #[test]
    fn apply_into_fills_output_slice() {
        let window = FixedWindow::new(2, 3).unwrap();
        let mut out = vec![0.0; 2];
        window.apply_into(&[1.0, 2.0, 3.0], &mut Sum, &mut out);
        assert_eq!(out, vec![3.0, 5.0]);
    }

    #[test]
    fn window_apply_checks_size_first() {
        let mut out = vec![0.0; 2];
        let err = window_apply(&[1.0, 2.0], 3, &mut Sum, &mut out).unwrap_err();
        assert_eq!(err, SeriesError::InvalidWindow { window: 3, nrow: 2 });
        window_apply(&[1.0, 2.0, 3.0], 2, &mut Sum, &mut out).unwrap();
        assert_eq!(out, vec![3.0, 5.0]);
    }
}
