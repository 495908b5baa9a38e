//! Delayed transposition.

use crate::base::{
    DenseExtractor, Element, Matrix, OracularDenseExtractor, OracularSparseExtractor, Options,
    Oracle, Selection, SharedMatrix, SparseExtractor,
};
use std::sync::Arc;

/// Swaps the rows and columns of the inner matrix. Row extraction is
/// forwarded as column extraction and vice versa, so no data is copied.
pub struct DelayedTranspose<T: Element> {
    inner: SharedMatrix<T>,
}

impl<T: Element> DelayedTranspose<T> {
    pub fn new(inner: SharedMatrix<T>) -> Self {
        Self { inner }
    }
}

impl<T: Element> Matrix<T> for DelayedTranspose<T> {
    fn nrow(&self) -> usize {
        self.inner.ncol()
    }

    fn ncol(&self) -> usize {
        self.inner.nrow()
    }

    fn is_sparse(&self) -> bool {
        self.inner.is_sparse()
    }

    fn is_sparse_proportion(&self) -> f64 {
        self.inner.is_sparse_proportion()
    }

    fn prefer_rows(&self) -> bool {
        !self.inner.prefer_rows()
    }

    fn prefer_rows_proportion(&self) -> f64 {
        1.0 - self.inner.prefer_rows_proportion()
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.inner.uses_oracle(!row)
    }

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        self.inner.dense(!row, selection, options)
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        self.inner.sparse(!row, selection, options)
    }

    fn dense_oracular(
        &self,
        row: bool,
        oracle: Arc<dyn Oracle>,
        selection: Selection,
        options: &Options,
    ) -> Box<dyn OracularDenseExtractor<T> + '_> {
        self.inner.dense_oracular(!row, oracle, selection, options)
    }

    fn sparse_oracular(
        &self,
        row: bool,
        oracle: Arc<dyn Oracle>,
        selection: Selection,
        options: &Options,
    ) -> Box<dyn OracularSparseExtractor<T> + '_> {
        self.inner.sparse_oracular(!row, oracle, selection, options)
    }
}
