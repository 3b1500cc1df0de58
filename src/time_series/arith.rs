//! Index-aligned arithmetic between series and with scalars.

use super::{IndexValue, TimeSeries};
use crate::align::intersection_map;
use crate::backend::Backend;
use crate::error::SeriesError;
use crate::functors::{BinaryFunctor, Divide, Minus, Multiply, Plus, Promote};
use crate::na::{na_guard, NaValue, Numeric};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use tracing::{debug, trace};

impl<'a, I: IndexValue, V: NaValue> TimeSeries<'a, I, V> {
    /// Combines the rows whose index appears in both series.
    ///
    /// Column counts must match, or one side must have a single column that
    /// is reused against every column of the other. Output column `c` reads
    /// column `c % ncol` of each side. A cell is NA when either operand is.
    ///
    /// # Errors
    /// Returns `ColumnCountMismatch` when the column counts cannot broadcast.
    pub fn binary_op<W, F>(
        &self,
        rhs: &TimeSeries<'_, I, W>,
        f: F,
    ) -> Result<TimeSeries<'static, I, F::Output>, SeriesError>
    where
        W: NaValue,
        F: BinaryFunctor<V, W>,
    {
        let (lhs_ncol, rhs_ncol) = (self.ncol(), rhs.ncol());
        if lhs_ncol != rhs_ncol && lhs_ncol != 1 && rhs_ncol != 1 {
            return Err(SeriesError::ColumnCountMismatch {
                lhs: lhs_ncol,
                rhs: rhs_ncol,
            });
        }

        let rowmap = intersection_map(self.index(), rhs.index());
        let ncol = if lhs_ncol == 0 || rhs_ncol == 0 {
            0
        } else {
            lhs_ncol.max(rhs_ncol)
        };
        debug!(
            op = "binary_op",
            lhs_nrow = self.nrow(),
            rhs_nrow = rhs.nrow(),
            lhs_ncol,
            rhs_ncol,
            out_nrow = rowmap.len(),
            out_ncol = ncol,
            "aligning series"
        );

        let index = rowmap.iter().map(|&(i, _)| self.index()[i]).collect();
        let mut data = Vec::with_capacity(rowmap.len() * ncol);
        for c in 0..ncol {
            let lhs_col = self.column(c % lhs_ncol);
            let rhs_col = rhs.column(c % rhs_ncol);
            trace!(column = c, lhs_column = c % lhs_ncol, rhs_column = c % rhs_ncol, "binary column");
            data.extend(
                rowmap
                    .iter()
                    .map(|&(i, j)| na_guard(lhs_col[i], rhs_col[j], |x, y| f.apply(x, y))),
            );
        }

        let chosen = if self.labels().len() >= rhs.labels().len() {
            self.labels()
        } else {
            rhs.labels()
        };
        let labels = if chosen.len() == ncol {
            chosen.to_vec()
        } else {
            Vec::new()
        };
        Ok(TimeSeries {
            backend: Backend::assemble(index, data, ncol, labels),
            config: self.config.clone(),
        })
    }

    /// `f(cell, scalar)` for every cell.
    pub fn scalar_op<S, F>(&self, scalar: S, f: F) -> TimeSeries<'static, I, F::Output>
    where
        S: NaValue,
        F: BinaryFunctor<V, S>,
    {
        debug!(op = "scalar_op", nrow = self.nrow(), ncol = self.ncol(), "scalar arithmetic");
        let data = self
            .data()
            .iter()
            .map(|&cell| na_guard(cell, scalar, |x, y| f.apply(x, y)))
            .collect();
        self.derive(self.index().to_vec(), data, self.ncol())
    }

    /// `f(scalar, cell)` for every cell.
    pub fn scalar_op_left<S, F>(&self, scalar: S, f: F) -> TimeSeries<'static, I, F::Output>
    where
        S: NaValue,
        F: BinaryFunctor<S, V>,
    {
        debug!(op = "scalar_op_left", nrow = self.nrow(), ncol = self.ncol(), "scalar arithmetic");
        let data = self
            .data()
            .iter()
            .map(|&cell| na_guard(scalar, cell, |x, y| f.apply(x, y)))
            .collect();
        self.derive(self.index().to_vec(), data, self.ncol())
    }
}

macro_rules! series_binary_op {
    ($trait:ident, $method:ident, $functor:ident) => {
        impl<'l, 'r, I, V, W> $trait<&TimeSeries<'r, I, W>> for &TimeSeries<'l, I, V>
        where
            I: IndexValue,
            V: Promote<W>,
            W: NaValue,
        {
            type Output = Result<TimeSeries<'static, I, <V as Promote<W>>::Output>, SeriesError>;

            fn $method(self, rhs: &TimeSeries<'r, I, W>) -> Self::Output {
                self.binary_op(rhs, $functor)
            }
        }
    };
}

series_binary_op!(Add, add, Plus);
series_binary_op!(Sub, sub, Minus);
series_binary_op!(Mul, mul, Multiply);
series_binary_op!(Div, div, Divide);

// NA cells stay NA; an NA scalar turns every cell NA.
macro_rules! compound_assign {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<'a, I: IndexValue, V: Numeric> $trait<V> for TimeSeries<'a, I, V> {
            fn $method(&mut self, rhs: V) {
                for cell in self.backend.data_mut().iter_mut() {
                    if !cell.is_na() {
                        *cell = na_guard(*cell, rhs, V::$op);
                    }
                }
            }
        }
    };
}

compound_assign!(AddAssign, add_assign, plus);
compound_assign!(SubAssign, sub_assign, minus);
compound_assign!(MulAssign, mul_assign, times);
compound_assign!(DivAssign, div_assign, divide);
