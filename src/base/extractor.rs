//! Extractor interfaces for pulling rows and columns out of a matrix.
//!
//! A "myopic" extractor is told the row/column to fetch on every call.
//! An "oracular" extractor is given an [`Oracle`] up front and fetches the
//! predicted sequence in order, which lets backends prefetch.

use super::oracle::Oracle;
use std::sync::Arc;

/// Structural non-zeros of a single row or column.
///
/// `value` and `index` are `None` when the corresponding option was
/// disabled at extractor construction.
#[derive(Debug, Clone, Copy)]
pub struct SparseRange<'a, T> {
    pub number: usize,
    pub value: Option<&'a [T]>,
    pub index: Option<&'a [usize]>,
}

impl<'a, T> SparseRange<'a, T> {
    pub fn new(number: usize, value: Option<&'a [T]>, index: Option<&'a [usize]>) -> Self {
        Self {
            number,
            value,
            index,
        }
    }

    pub fn empty() -> Self {
        Self {
            number: 0,
            value: None,
            index: None,
        }
    }
}

/// The first `n` elements of `buffer`, or `None` when `keep` is false.
pub fn take_prefix<X>(keep: bool, buffer: &mut [X], n: usize) -> Option<&[X]> {
    if keep {
        Some(&buffer[..n])
    } else {
        None
    }
}

/// Dense access to one row or column at a time.
pub trait DenseExtractor<T> {
    /// Fetch the selected elements of row/column `i`.
    ///
    /// `buffer` must be at least as long as the selection. The returned
    /// slice may point into `buffer` or directly into the matrix storage.
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T];
}

/// Sparse access to one row or column at a time.
pub trait SparseExtractor<T> {
    /// Fetch the structural non-zeros of row/column `i` within the selection.
    ///
    /// Both buffers must be at least as long as the selection (or empty when
    /// the corresponding option is disabled).
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T>;
}

/// Dense access following a predetermined sequence of rows/columns.
pub trait OracularDenseExtractor<T> {
    fn fetch<'b>(&'b mut self, buffer: &'b mut [T]) -> &'b [T];
}

/// Sparse access following a predetermined sequence of rows/columns.
pub trait OracularSparseExtractor<T> {
    fn fetch<'b>(&'b mut self, vbuffer: &'b mut [T], ibuffer: &'b mut [usize]) -> SparseRange<'b, T>;
}

/// Oracular wrapper around a myopic dense extractor for backends that
/// gain nothing from predictions.
pub struct PseudoOracularDense<'a, T> {
    oracle: Arc<dyn Oracle>,
    used: usize,
    inner: Box<dyn DenseExtractor<T> + 'a>,
}

impl<'a, T> PseudoOracularDense<'a, T> {
    pub fn new(oracle: Arc<dyn Oracle>, inner: Box<dyn DenseExtractor<T> + 'a>) -> Self {
        Self {
            oracle,
            used: 0,
            inner,
        }
    }
}

impl<T> OracularDenseExtractor<T> for PseudoOracularDense<'_, T> {
    fn fetch<'b>(&'b mut self, buffer: &'b mut [T]) -> &'b [T] {
        let i = self.oracle.get(self.used);
        self.used += 1;
        self.inner.fetch(i, buffer)
    }
}

/// Sparse counterpart to [`PseudoOracularDense`].
pub struct PseudoOracularSparse<'a, T> {
    oracle: Arc<dyn Oracle>,
    used: usize,
    inner: Box<dyn SparseExtractor<T> + 'a>,
}

impl<'a, T> PseudoOracularSparse<'a, T> {
    pub fn new(oracle: Arc<dyn Oracle>, inner: Box<dyn SparseExtractor<T> + 'a>) -> Self {
        Self {
            oracle,
            used: 0,
            inner,
        }
    }
}

impl<T> OracularSparseExtractor<T> for PseudoOracularSparse<'_, T> {
    fn fetch<'b>(&'b mut self, vbuffer: &'b mut [T], ibuffer: &'b mut [usize]) -> SparseRange<'b, T> {
        let i = self.oracle.get(self.used);
        self.used += 1;
        self.inner.fetch(i, vbuffer, ibuffer)
    }
}
