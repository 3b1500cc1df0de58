//! Row selection, period aggregation and reindexing.

use super::{IndexValue, TimeSeries};
use crate::align::{breaks, RangeSpecifier};
use crate::error::SeriesError;
use crate::na::NaValue;
use crate::partition::PartitionFunction;
use crate::window::Reducer;
use std::collections::BTreeSet;
use tracing::{debug, trace};

impl<'a, I: IndexValue, V: NaValue> TimeSeries<'a, I, V> {
    /// Aggregates each period with `reducer`.
    ///
    /// Rows are grouped by `partition.key(index, n)`; a period ends where
    /// the key changes. One output row is produced per period, at the index
    /// of the period's last row.
    pub fn time_window<P, R>(&self, n: u32, partition: &P, reducer: R) -> TimeSeries<'static, I, R::Output>
    where
        P: PartitionFunction<I>,
        R: Reducer<V> + Clone,
    {
        let ends = self.period_ends(n, partition);
        let ncol = self.ncol();
        debug!(op = "time_window", n, nrow = self.nrow(), ncol, periods = ends.len(), "aggregating periods");

        let index = ends.iter().map(|&end| self.index()[end]).collect();
        let mut data = Vec::with_capacity(ends.len() * ncol);
        for c in 0..ncol {
            let column = self.column(c);
            let mut reducer = reducer.clone();
            let mut start = 0;
            for &end in &ends {
                data.push(reducer.apply(&column[start..=end]));
                start = end + 1;
            }
        }
        self.derive(index, data, ncol)
    }

    /// Keeps the last row of each period.
    pub fn freq<P>(&self, n: u32, partition: &P) -> TimeSeries<'static, I, V>
    where
        P: PartitionFunction<I>,
    {
        let ends = self.period_ends(n, partition);
        debug!(op = "freq", n, nrow = self.nrow(), periods = ends.len(), "sampling period ends");
        self.select_rows(&ends)
    }

    /// Rows at `positions`, in the given order.
    ///
    /// # Errors
    /// Returns `RowOutOfBounds` for the first position `>= nrow`.
    pub fn row_subset(&self, positions: &[usize]) -> Result<TimeSeries<'static, I, V>, SeriesError> {
        let nrow = self.nrow();
        if let Some(&row) = positions.iter().find(|&&row| row >= nrow) {
            return Err(SeriesError::RowOutOfBounds { row, nrow });
        }
        debug!(op = "row_subset", nrow, rows = positions.len(), "selecting rows");
        Ok(self.select_rows(positions))
    }

    /// Reindexes onto the sorted union of the current index and `new_index`.
    ///
    /// Rows that only exist in `new_index` are NA.
    pub fn pad(&self, new_index: &[I]) -> TimeSeries<'static, I, V> {
        let union: Vec<I> = self
            .index()
            .iter()
            .chain(new_index)
            .copied()
            .collect::<BTreeSet<I>>()
            .into_iter()
            .collect();
        let rows = union.len();
        let ncol = self.ncol();
        let range = RangeSpecifier::new(self.index(), &union);
        debug!(op = "pad", nrow = self.nrow(), ncol, padded_nrow = rows, "padding series");
        trace!(copied = range.len(), "pad row map");

        let mut data = vec![V::na(); rows * ncol];
        for c in 0..ncol {
            let column = self.column(c);
            let target = &mut data[c * rows..(c + 1) * rows];
            for (old, new) in range.pairs() {
                target[new] = column[old];
            }
        }
        self.derive(union, data, ncol)
    }

    fn period_ends<P: PartitionFunction<I>>(&self, n: u32, partition: &P) -> Vec<usize> {
        let keys: Vec<I> = self.index().iter().map(|&idx| partition.key(idx, n)).collect();
        breaks(&keys)
    }

    /// Positions must already be in range.
    fn select_rows(&self, positions: &[usize]) -> TimeSeries<'static, I, V> {
        let ncol = self.ncol();
        let index = positions.iter().map(|&row| self.index()[row]).collect();
        let mut data = Vec::with_capacity(positions.len() * ncol);
        for c in 0..ncol {
            let column = self.column(c);
            data.extend(positions.iter().map(|&row| column[row]));
        }
        self.derive(index, data, ncol)
    }
}
