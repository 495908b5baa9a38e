//! Dense matrix stored as a single contiguous array.

use super::sparsified::SparsifiedWrapper;
use crate::base::{DenseExtractor, Element, Matrix, Options, Selection, SparseExtractor};
use crate::error::{MatrixError, Result};

/// Dense matrix in row-major or column-major layout.
#[derive(Debug, Clone)]
pub struct DenseMatrix<T> {
    nrow: usize,
    ncol: usize,
    values: Vec<T>,
    row_major: bool,
}

impl<T: Element> DenseMatrix<T> {
    pub fn new(nrow: usize, ncol: usize, values: Vec<T>, row_major: bool) -> Result<Self> {
        let expected = nrow.checked_mul(ncol).ok_or_else(|| {
            MatrixError::InvalidArgument(format!("{} x {} overflows usize", nrow, ncol))
        })?;
        if values.len() != expected {
            return Err(MatrixError::DimensionMismatch(format!(
                "length of 'values' ({}) should be equal to product of 'nrow' and 'ncol' ({})",
                values.len(),
                expected
            )));
        }
        Ok(Self {
            nrow,
            ncol,
            values,
            row_major,
        })
    }

    pub fn row_major(nrow: usize, ncol: usize, values: Vec<T>) -> Result<Self> {
        Self::new(nrow, ncol, values, true)
    }

    pub fn column_major(nrow: usize, ncol: usize, values: Vec<T>) -> Result<Self> {
        Self::new(nrow, ncol, values, false)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn is_row_major(&self) -> bool {
        self.row_major
    }

    fn primary(&self) -> usize {
        if self.row_major {
            self.nrow
        } else {
            self.ncol
        }
    }

    fn secondary(&self) -> usize {
        if self.row_major {
            self.ncol
        } else {
            self.nrow
        }
    }
}

struct PrimaryDense<'a, T> {
    values: &'a [T],
    secondary: usize,
    selection: Selection,
}

impl<T: Element> DenseExtractor<T> for PrimaryDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let offset = i * self.secondary;
        match &self.selection {
            Selection::Full => &self.values[offset..offset + self.secondary],
            Selection::Block { start, length } => {
                &self.values[offset + start..offset + start + length]
            }
            Selection::Index(indices) => {
                for (out, &x) in buffer.iter_mut().zip(indices.iter()) {
                    *out = self.values[offset + x];
                }
                &buffer[..indices.len()]
            }
        }
    }
}

struct SecondaryDense<'a, T> {
    values: &'a [T],
    secondary: usize,
    primary: usize,
    selection: Selection,
}

impl<T: Element> DenseExtractor<T> for SecondaryDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let n = self.selection.extent(self.primary);
        for (out, p) in buffer.iter_mut().zip(self.selection.iter(self.primary)) {
            *out = self.values[p * self.secondary + i];
        }
        &buffer[..n]
    }
}

impl<T: Element> Matrix<T> for DenseMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        false
    }

    fn prefer_rows(&self) -> bool {
        self.row_major
    }

    fn dense(&self, row: bool, selection: Selection, _options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        if row == self.row_major {
            Box::new(PrimaryDense {
                values: &self.values,
                secondary: self.secondary(),
                selection,
            })
        } else {
            Box::new(SecondaryDense {
                values: &self.values,
                secondary: self.secondary(),
                primary: self.primary(),
                selection,
            })
        }
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        let full = self.non_target_dim(row);
        let inner = self.dense(row, selection.clone(), options);
        Box::new(SparsifiedWrapper::new(inner, &selection, full, options))
    }
}
