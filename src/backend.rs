//! Column-major storage behind a [`TimeSeries`](crate::TimeSeries).
//!
//! A backend holds an index buffer of `nrow` values, a data buffer of
//! `nrow * ncol` cells laid out column by column, and an optional list of
//! column labels. Each buffer is either owned or borrowed from the caller;
//! copies are always owned.

use crate::error::SeriesError;
use std::ops::{Deref, DerefMut, Range};

/// Storage handle that either owns its values or borrows caller memory.
///
/// Cloning always produces an owned deep copy.
#[derive(Debug)]
pub enum Buffer<'a, T> {
    /// Allocated and released by the backend
    Owned(Vec<T>),
    /// Caller memory; never released by the backend
    Borrowed(&'a mut [T]),
}

impl<'a, T> Buffer<'a, T> {
    /// Whether the buffer owns its values.
    pub fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }
}

impl<'a, T: Clone> Buffer<'a, T> {
    /// Converts into an owned vector, copying only when borrowed.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Buffer::Owned(values) => values,
            Buffer::Borrowed(values) => values.to_vec(),
        }
    }
}

impl<'a, T> Default for Buffer<'a, T> {
    fn default() -> Self {
        Buffer::Owned(Vec::new())
    }
}

impl<'a, T: Clone> Clone for Buffer<'a, T> {
    fn clone(&self) -> Self {
        Buffer::Owned(self.to_vec())
    }
}

impl<'a, T> Deref for Buffer<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            Buffer::Owned(values) => values.as_slice(),
            Buffer::Borrowed(values) => &**values,
        }
    }
}

impl<'a, T> DerefMut for Buffer<'a, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Buffer::Owned(values) => values.as_mut_slice(),
            Buffer::Borrowed(values) => &mut **values,
        }
    }
}

impl<'a, T> From<Vec<T>> for Buffer<'a, T> {
    fn from(values: Vec<T>) -> Self {
        Buffer::Owned(values)
    }
}

impl<'a, T> From<&'a mut [T]> for Buffer<'a, T> {
    fn from(values: &'a mut [T]) -> Self {
        Buffer::Borrowed(values)
    }
}

/// Ownership mode of a backend as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Both buffers are owned
    Owned,
    /// At least one buffer borrows caller memory
    Borrowed,
}

/// Index, column-major data and labels of one series.
#[derive(Debug, Clone)]
pub struct Backend<'a, I, V> {
    index: Buffer<'a, I>,
    data: Buffer<'a, V>,
    ncol: usize,
    labels: Vec<String>,
}

impl<'a, I, V> Default for Backend<'a, I, V> {
    fn default() -> Self {
        Backend {
            index: Buffer::default(),
            data: Buffer::default(),
            ncol: 0,
            labels: Vec::new(),
        }
    }
}

impl<I: Clone + Default, V: Clone + Default> Backend<'static, I, V> {
    /// Allocates an owned `nrow x ncol` backend filled with default values.
    pub fn new(nrow: usize, ncol: usize) -> Self {
        Backend {
            index: Buffer::Owned(vec![I::default(); nrow]),
            data: Buffer::Owned(vec![V::default(); nrow * ncol]),
            ncol,
            labels: Vec::new(),
        }
    }
}

impl<I, V> Backend<'static, I, V> {
    /// Takes ownership of caller vectors.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when `data.len() != index.len() * ncol`.
    pub fn from_vecs(data: Vec<V>, index: Vec<I>, ncol: usize) -> Result<Self, SeriesError> {
        Backend::wrap(Buffer::Owned(data), Buffer::Owned(index), ncol)
    }

    /// Builds an owned backend whose shape the caller already guarantees.
    pub(crate) fn assemble(index: Vec<I>, data: Vec<V>, ncol: usize, labels: Vec<String>) -> Self {
        debug_assert_eq!(data.len(), index.len() * ncol);
        debug_assert!(labels.is_empty() || labels.len() == ncol);
        Backend {
            index: Buffer::Owned(index),
            data: Buffer::Owned(data),
            ncol,
            labels,
        }
    }
}

impl<'a, I, V> Backend<'a, I, V> {
    /// Wraps caller memory without copying it.
    ///
    /// Writes through [`data_mut`](Self::data_mut) and
    /// [`index_mut`](Self::index_mut) land in the caller's buffers.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when `data.len() != index.len() * ncol`.
    pub fn borrowed(data: &'a mut [V], index: &'a mut [I], ncol: usize) -> Result<Self, SeriesError> {
        Backend::wrap(Buffer::Borrowed(data), Buffer::Borrowed(index), ncol)
    }

    /// Builds a backend from arbitrary buffer handles.
    pub fn wrap(data: Buffer<'a, V>, index: Buffer<'a, I>, ncol: usize) -> Result<Self, SeriesError> {
        let expected = index.len() * ncol;
        if data.len() != expected {
            return Err(SeriesError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Backend {
            index,
            data,
            ncol,
            labels: Vec::new(),
        })
    }

    /// Returns the number of rows.
    pub fn nrow(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of columns.
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Owned only when both buffers are owned.
    pub fn ownership(&self) -> Ownership {
        if self.index.is_owned() && self.data.is_owned() {
            Ownership::Owned
        } else {
            Ownership::Borrowed
        }
    }

    /// Returns the row index.
    pub fn index(&self) -> &[I] {
        &self.index
    }

    /// Mutable row index.
    pub fn index_mut(&mut self) -> &mut [I] {
        &mut self.index
    }

    /// All cells, column after column.
    pub fn data(&self) -> &[V] {
        &self.data
    }

    /// Mutable cells, column after column.
    pub fn data_mut(&mut self) -> &mut [V] {
        &mut self.data
    }

    /// Half-open range of column `i` inside the data buffer.
    pub fn column_range(&self, i: usize) -> Range<usize> {
        let nrow = self.nrow();
        i * nrow..(i + 1) * nrow
    }

    /// Returns column `i`.
    pub fn column(&self, i: usize) -> &[V] {
        let range = self.column_range(i);
        &self.data[range]
    }

    /// Mutable column `i`.
    pub fn column_mut(&mut self, i: usize) -> &mut [V] {
        let range = self.column_range(i);
        &mut self.data[range]
    }

    /// Returns the column labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the number of labels.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Replaces the labels when exactly one is given per column.
    ///
    /// # Errors
    /// Returns `LabelCountMismatch` and keeps the current labels otherwise.
    pub fn set_labels<L, S>(&mut self, names: L) -> Result<(), SeriesError>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.ncol {
            return Err(SeriesError::LabelCountMismatch {
                expected: self.ncol,
                actual: names.len(),
            });
        }
        self.labels = names;
        Ok(())
    }

    /// Moves the contents out, leaving an empty owned backend behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<'a, I: Clone, V: Clone> Backend<'a, I, V> {
    /// Detaches from caller memory, copying any borrowed buffer.
    pub fn into_owned(self) -> Backend<'static, I, V> {
        Backend {
            index: Buffer::Owned(self.index.into_vec()),
            data: Buffer::Owned(self.data.into_vec()),
            ncol: self.ncol,
            labels: self.labels,
        }
    }

    /// Owned deep copy that outlives any borrowed source buffers.
    pub fn to_owned_backend(&self) -> Backend<'static, I, V> {
        Backend {
            index: Buffer::Owned(self.index.to_vec()),
            data: Buffer::Owned(self.data.to_vec()),
            ncol: self.ncol,
            labels: self.labels.clone(),
        }
    }

    /// Replaces the contents with an owned copy of `rhs`.
    ///
    /// A borrowed backend releases its borrow and becomes owned; it never
    /// starts sharing `rhs`'s buffers.
    pub fn assign_from(&mut self, rhs: &Backend<'_, I, V>) {
        self.index = Buffer::Owned(rhs.index.to_vec());
        self.data = Buffer::Owned(rhs.data.to_vec());
        self.ncol = rhs.ncol;
        self.labels = rhs.labels.clone();
    }
}
