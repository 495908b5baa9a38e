//! The abstract matrix interface.

use super::extractor::{
    DenseExtractor, OracularDenseExtractor, OracularSparseExtractor, PseudoOracularDense,
    PseudoOracularSparse, SparseExtractor,
};
use super::oracle::Oracle;
use super::selection::{Options, Selection};
use std::fmt::Debug;
use std::sync::Arc;

/// Types that can be stored in a matrix. `T::default()` is the structural zero.
pub trait Element: Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {}

/// Reference-counted handle used by the delayed wrappers.
pub type SharedMatrix<T> = Arc<dyn Matrix<T>>;

/// Read-only two-dimensional matrix.
///
/// Access goes through extractors: `row = true` iterates over rows (each
/// fetch returns elements from the columns in the selection), `row = false`
/// iterates over columns.
pub trait Matrix<T: Element>: Send + Sync {
    fn nrow(&self) -> usize;

    fn ncol(&self) -> usize;

    /// Whether sparse extraction is more efficient than dense extraction.
    fn is_sparse(&self) -> bool;

    /// Proportion of the matrix that is sparse, for weighting in composites.
    fn is_sparse_proportion(&self) -> f64 {
        if self.is_sparse() {
            1.0
        } else {
            0.0
        }
    }

    /// Whether row access is preferred over column access.
    fn prefer_rows(&self) -> bool;

    /// Proportion of the matrix that prefers row access.
    fn prefer_rows_proportion(&self) -> f64 {
        if self.prefer_rows() {
            1.0
        } else {
            0.0
        }
    }

    /// Whether oracular extraction is any faster than myopic extraction.
    fn uses_oracle(&self, _row: bool) -> bool {
        false
    }

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_>;

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_>;

    fn dense_oracular(
        &self,
        row: bool,
        oracle: Arc<dyn Oracle>,
        selection: Selection,
        options: &Options,
    ) -> Box<dyn OracularDenseExtractor<T> + '_> {
        Box::new(PseudoOracularDense::new(oracle, self.dense(row, selection, options)))
    }

    fn sparse_oracular(
        &self,
        row: bool,
        oracle: Arc<dyn Oracle>,
        selection: Selection,
        options: &Options,
    ) -> Box<dyn OracularSparseExtractor<T> + '_> {
        Box::new(PseudoOracularSparse::new(oracle, self.sparse(row, selection, options)))
    }

    /// Number of rows (`row = true`) or columns that can be extracted.
    fn target_dim(&self, row: bool) -> usize {
        if row {
            self.nrow()
        } else {
            self.ncol()
        }
    }

    /// Length of each extracted row (`row = true`) or column.
    fn non_target_dim(&self, row: bool) -> usize {
        if row {
            self.ncol()
        } else {
            self.nrow()
        }
    }

    fn dense_row(&self) -> Box<dyn DenseExtractor<T> + '_> {
        self.dense(true, Selection::Full, &Options::default())
    }

    fn dense_column(&self) -> Box<dyn DenseExtractor<T> + '_> {
        self.dense(false, Selection::Full, &Options::default())
    }

    fn sparse_row(&self) -> Box<dyn SparseExtractor<T> + '_> {
        self.sparse(true, Selection::Full, &Options::default())
    }

    fn sparse_column(&self) -> Box<dyn SparseExtractor<T> + '_> {
        self.sparse(false, Selection::Full, &Options::default())
    }
}

/// Whether `x` is the structural zero.
#[inline]
pub fn is_zero<T: Element>(x: T) -> bool {
    x == T::default()
}
