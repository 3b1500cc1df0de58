//! The series engine.
//!
//! A [`TimeSeries`] pairs a [`Backend`] with an [`EngineConfig`]. Every
//! operation except the explicit mutators reads `self` and returns a new,
//! owned series that inherits the config.

mod arith;
mod resample;

use crate::backend::{Backend, Ownership};
use crate::config::EngineConfig;
use crate::error::SeriesError;
use crate::na::{na_guard, NaValue, Numeric};
use crate::transform::{ColumnTransform, ColumnTransformWith};
use crate::window::{FixedWindow, Reducer, WindowStrategy};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Index, IndexMut};
use tracing::{debug, trace, warn};

/// Requirements on index values. Blanket-implemented.
pub trait IndexValue: Copy + Ord + Debug + Send + Sync + 'static {}

impl<T> IndexValue for T where T: Copy + Ord + Debug + Send + Sync + 'static {}

/// Totally ordered floating point index, for series keyed by e.g. fractional years.
pub type FloatIndex = OrderedFloat<f64>;

/// Column-major numeric table ordered by an ascending index.
#[derive(Debug, Clone)]
pub struct TimeSeries<'a, I, V> {
    backend: Backend<'a, I, V>,
    config: EngineConfig,
}

impl<I: IndexValue + Default, V: NaValue> TimeSeries<'static, I, V> {
    /// Owned `nrow x ncol` series of default index values and cells.
    pub fn new(nrow: usize, ncol: usize) -> Self {
        TimeSeries::from_backend(Backend::new(nrow, ncol))
    }
}

impl<I: IndexValue, V: NaValue> TimeSeries<'static, I, V> {
    /// Takes ownership of column-major `data` and `index`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when `data.len() != index.len() * ncol`.
    pub fn from_vecs(data: Vec<V>, index: Vec<I>, ncol: usize) -> Result<Self, SeriesError> {
        Ok(TimeSeries::from_backend(Backend::from_vecs(data, index, ncol)?))
    }
}

impl<'a, I: IndexValue, V: NaValue> TimeSeries<'a, I, V> {
    /// Wraps an existing backend with the default config.
    pub fn from_backend(backend: Backend<'a, I, V>) -> Self {
        TimeSeries {
            backend,
            config: EngineConfig::default(),
        }
    }

    /// Wraps caller buffers without copying. Cell writes land in `data`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when `data.len() != index.len() * ncol`.
    pub fn borrowed(data: &'a mut [V], index: &'a mut [I], ncol: usize) -> Result<Self, SeriesError> {
        Ok(TimeSeries::from_backend(Backend::borrowed(data, index, ncol)?))
    }

    /// Replaces the config carried by this series.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the engine config.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the number of rows.
    pub fn nrow(&self) -> usize {
        self.backend.nrow()
    }

    /// Returns the number of columns.
    pub fn ncol(&self) -> usize {
        self.backend.ncol()
    }

    /// Returns the row index.
    pub fn index(&self) -> &[I] {
        self.backend.index()
    }

    /// All cells, column after column.
    pub fn data(&self) -> &[V] {
        self.backend.data()
    }

    /// Returns column `i`.
    pub fn column(&self, i: usize) -> &[V] {
        self.backend.column(i)
    }

    /// Returns the column labels.
    pub fn labels(&self) -> &[String] {
        self.backend.labels()
    }

    /// Returns the underlying storage.
    pub fn backend(&self) -> &Backend<'a, I, V> {
        &self.backend
    }

    /// Consumes the series, returning its storage.
    pub fn into_backend(self) -> Backend<'a, I, V> {
        self.backend
    }

    /// Reports whether the buffers are owned or borrowed.
    pub fn ownership(&self) -> Ownership {
        self.backend.ownership()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&V> {
        if row < self.nrow() && col < self.ncol() {
            self.backend.column(col).get(row)
        } else {
            None
        }
    }

    /// Mutable cell at `(row, col)`, or `None` when out of range.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut V> {
        if row < self.nrow() && col < self.ncol() {
            self.backend.column_mut(col).get_mut(row)
        } else {
            None
        }
    }

    /// Replaces the labels when exactly one name per column is given.
    ///
    /// # Errors
    /// Returns `LabelCountMismatch` and leaves the labels unchanged otherwise.
    pub fn set_labels<L, S>(&mut self, names: L) -> Result<(), SeriesError>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backend.set_labels(names).map_err(|err| {
            warn!(error = %err, ncol = self.backend.ncol(), "set_labels rejected");
            err
        })
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: V) {
        self.backend.data_mut().fill(value);
    }

    /// Replaces the contents with an owned deep copy of `other`.
    pub fn assign_from(&mut self, other: &TimeSeries<'_, I, V>) {
        self.backend.assign_from(&other.backend);
    }

    /// Owned deep copy detached from any borrowed buffers.
    pub fn to_owned_series(&self) -> TimeSeries<'static, I, V> {
        TimeSeries {
            backend: self.backend.to_owned_backend(),
            config: self.config.clone(),
        }
    }

    /// Converts into an owned series, copying only borrowed buffers.
    pub fn into_owned(self) -> TimeSeries<'static, I, V> {
        TimeSeries {
            backend: self.backend.into_owned(),
            config: self.config,
        }
    }

    /// Result row `i` carries index `index[n + i]` and the cells of row `i`.
    ///
    /// # Errors
    /// Returns `InvalidShift` unless `n < nrow`.
    pub fn lag(&self, n: usize) -> Result<TimeSeries<'static, I, V>, SeriesError> {
        self.check_shift("lag", n)?;
        debug!(op = "lag", n, nrow = self.nrow(), ncol = self.ncol(), "shifting series");
        Ok(self.slice_rows(n, 0, self.nrow() - n))
    }

    /// Result row `i` carries index `index[i]` and the cells of row `n + i`.
    ///
    /// # Errors
    /// Returns `InvalidShift` unless `n < nrow`.
    pub fn lead(&self, n: usize) -> Result<TimeSeries<'static, I, V>, SeriesError> {
        self.check_shift("lead", n)?;
        debug!(op = "lead", n, nrow = self.nrow(), ncol = self.ncol(), "shifting series");
        Ok(self.slice_rows(0, n, self.nrow() - n))
    }

    /// Positive `n` lags, negative `n` leads, zero copies.
    pub fn shift(&self, n: isize) -> Result<TimeSeries<'static, I, V>, SeriesError> {
        match n.cmp(&0) {
            Ordering::Greater => self.lag(n.unsigned_abs()),
            Ordering::Less => self.lead(n.unsigned_abs()),
            Ordering::Equal => Ok(self.to_owned_series()),
        }
    }

    /// `data[r] - data[r - n]` at index `index[r]` for every `r >= n`.
    ///
    /// # Errors
    /// Returns `InvalidShift` unless `n < nrow`.
    pub fn diff(&self, n: usize) -> Result<TimeSeries<'static, I, V>, SeriesError>
    where
        V: Numeric,
    {
        self.check_shift("diff", n)?;
        let nrow = self.nrow();
        let ncol = self.ncol();
        debug!(op = "diff", n, nrow, ncol, "differencing series");

        let mut data = Vec::with_capacity((nrow - n) * ncol);
        for c in 0..ncol {
            let column = self.column(c);
            data.extend(
                column[n..]
                    .iter()
                    .zip(column)
                    .map(|(&current, &previous)| na_guard(current, previous, V::minus)),
            );
        }
        Ok(self.derive(self.index()[n..].to_vec(), data, ncol))
    }

    /// Applies `f` to every column; index and labels carry over.
    pub fn transform<F>(&self, f: &F) -> TimeSeries<'static, I, F::Output>
    where
        F: ColumnTransform<V> + Sync,
    {
        let nrow = self.nrow();
        debug!(op = "transform", nrow, ncol = self.ncol(), "transforming series");
        let data = self.map_columns(nrow, |input, output| f.apply(input, output));
        self.derive(self.index().to_vec(), data, self.ncol())
    }

    /// Like [`transform`](Self::transform) with one extra argument per call.
    pub fn transform_1arg<F, A>(&self, f: &F, arg: A) -> TimeSeries<'static, I, F::Output>
    where
        F: ColumnTransformWith<V, A> + Sync,
        A: Copy + Sync,
    {
        let nrow = self.nrow();
        debug!(op = "transform_1arg", nrow, ncol = self.ncol(), "transforming series");
        let data = self.map_columns(nrow, |input, output| f.apply(input, output, arg));
        self.derive(self.index().to_vec(), data, self.ncol())
    }

    /// Rolling aggregation over `window` consecutive rows.
    ///
    /// Output row `k` holds `reducer(column[k..k + window])` at index
    /// `index[k + window - 1]`. Each column reduces with its own clone of
    /// `reducer`.
    ///
    /// # Errors
    /// Returns `InvalidWindow` unless `1 <= window <= nrow`.
    pub fn window<R>(&self, window: usize, reducer: R) -> Result<TimeSeries<'static, I, R::Output>, SeriesError>
    where
        R: Reducer<V> + Clone + Sync,
    {
        let nrow = self.nrow();
        let fixed = FixedWindow::new(window, nrow)?;
        let out_nrow = fixed.output_len(nrow);
        debug!(op = "window", window, nrow, ncol = self.ncol(), out_nrow, "rolling window");

        let data = self.map_columns(out_nrow, |input, output| {
            let mut reducer = reducer.clone();
            fixed.apply_into(input, &mut reducer, output);
        });
        Ok(self.derive(self.index()[fixed.burn_in()..].to_vec(), data, self.ncol()))
    }

    fn check_shift(&self, op: &'static str, n: usize) -> Result<(), SeriesError> {
        if n >= self.nrow() {
            return Err(SeriesError::InvalidShift {
                op,
                n,
                nrow: self.nrow(),
            });
        }
        Ok(())
    }

    /// `len` rows: index from `index_start`, cells from `data_start`.
    fn slice_rows(&self, index_start: usize, data_start: usize, len: usize) -> TimeSeries<'static, I, V> {
        let ncol = self.ncol();
        let index = self.index()[index_start..index_start + len].to_vec();
        let mut data = Vec::with_capacity(len * ncol);
        for c in 0..ncol {
            data.extend_from_slice(&self.column(c)[data_start..data_start + len]);
        }
        self.derive(index, data, ncol)
    }

    /// Owned result series sharing this series' labels and config.
    fn derive<W: NaValue>(&self, index: Vec<I>, data: Vec<W>, ncol: usize) -> TimeSeries<'static, I, W> {
        let labels = if self.labels().len() == ncol {
            self.labels().to_vec()
        } else {
            Vec::new()
        };
        TimeSeries {
            backend: Backend::assemble(index, data, ncol, labels),
            config: self.config.clone(),
        }
    }

    /// Runs `op(input_column, output_column)` for every column, on the rayon
    /// pool when the config allows it.
    fn map_columns<W, F>(&self, out_nrow: usize, op: F) -> Vec<W>
    where
        W: NaValue,
        F: Fn(&[V], &mut [W]) + Sync,
    {
        let nrow = self.nrow();
        let ncol = self.ncol();
        let mut out = vec![W::default(); out_nrow * ncol];
        if nrow == 0 || out_nrow == 0 {
            return out;
        }

        let source = self.backend.data();
        if ncol > 1 && self.config.use_parallel(nrow) {
            trace!(nrow, ncol, "parallel column pass");
            source
                .par_chunks(nrow)
                .zip(out.par_chunks_mut(out_nrow))
                .for_each(|(input, output)| op(input, output));
        } else {
            for (c, (input, output)) in source.chunks(nrow).zip(out.chunks_mut(out_nrow)).enumerate() {
                trace!(column = c, "column pass");
                op(input, output);
            }
        }
        out
    }
}

impl<'a, I: IndexValue, V: NaValue> Index<(usize, usize)> for TimeSeries<'a, I, V> {
    type Output = V;

    /// Cell at `(row, col)`. Panics when out of range.
    fn index(&self, (row, col): (usize, usize)) -> &V {
        &self.backend.column(col)[row]
    }
}

impl<'a, I: IndexValue, V: NaValue> IndexMut<(usize, usize)> for TimeSeries<'a, I, V> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut V {
        &mut self.backend.column_mut(col)[row]
    }
}
