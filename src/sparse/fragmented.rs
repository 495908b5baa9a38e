//! Fragmented sparse matrix, with separate storage for each row/column.

use super::extraction::{
    check_indices, PrimaryDense, PrimarySparse, SecondaryDense, SecondarySparse, SparseIndices,
    SparseStore,
};
use crate::base::{DenseExtractor, Element, Matrix, Options, Selection, SparseExtractor};
use crate::error::{MatrixError, Result};

/// Sparse matrix where each row (`by_row = true`) or column owns its own
/// vectors of values and indices. Useful when the number of non-zeros per
/// element is not known ahead of time.
#[derive(Debug, Clone)]
pub struct FragmentedSparseMatrix<T> {
    nrow: usize,
    ncol: usize,
    values: Vec<Vec<T>>,
    indices: Vec<Vec<usize>>,
    by_row: bool,
}

impl<T: Element> FragmentedSparseMatrix<T> {
    pub fn new(
        nrow: usize,
        ncol: usize,
        values: Vec<Vec<T>>,
        indices: Vec<Vec<usize>>,
        by_row: bool,
        check: bool,
    ) -> Result<Self> {
        let output = Self {
            nrow,
            ncol,
            values,
            indices,
            by_row,
        };
        if check {
            output.validate()?;
        }
        Ok(output)
    }

    fn validate(&self) -> Result<()> {
        if self.values.len() != self.indices.len() {
            return Err(MatrixError::InvalidSparse(
                "'values' and 'indices' should be of the same length".to_string(),
            ));
        }
        if self.values.len() != self.primary_len() {
            return Err(MatrixError::InvalidSparse(format!(
                "length of 'values' should be equal to the number of {}",
                if self.by_row { "rows" } else { "columns" }
            )));
        }
        for (p, (v, i)) in self.values.iter().zip(&self.indices).enumerate() {
            if v.len() != i.len() {
                return Err(MatrixError::InvalidSparse(format!(
                    "corresponding elements of 'values' and 'indices' should have the same length (element {})",
                    p
                )));
            }
        }
        check_indices(self.indices.iter().map(|x| x.as_slice()), self.secondary_len())
    }

    pub fn values(&self) -> &[Vec<T>] {
        &self.values
    }

    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    pub fn is_by_row(&self) -> bool {
        self.by_row
    }
}

impl<T: Element> SparseIndices for FragmentedSparseMatrix<T> {
    fn primary_len(&self) -> usize {
        if self.by_row {
            self.nrow
        } else {
            self.ncol
        }
    }

    fn secondary_len(&self) -> usize {
        if self.by_row {
            self.ncol
        } else {
            self.nrow
        }
    }

    fn primary_indices(&self, p: usize) -> &[usize] {
        &self.indices[p]
    }
}

impl<T: Element> SparseStore<T> for FragmentedSparseMatrix<T> {
    fn primary_values(&self, p: usize) -> &[T] {
        &self.values[p]
    }
}

impl<T: Element> Matrix<T> for FragmentedSparseMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn prefer_rows(&self) -> bool {
        self.by_row
    }

    fn dense(&self, row: bool, selection: Selection, _options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        if row == self.by_row {
            Box::new(PrimaryDense::new(self, selection))
        } else {
            Box::new(SecondaryDense::new(self, selection))
        }
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if row == self.by_row {
            Box::new(PrimarySparse::new(self, selection, options))
        } else {
            Box::new(SecondarySparse::new(self, selection, options))
        }
    }
}
