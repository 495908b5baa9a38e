//! Compressed sparse row/column matrix.

use super::extraction::{
    check_indices, PrimaryDense, PrimarySparse, SecondaryDense, SecondarySparse, SparseIndices,
    SparseStore,
};
use crate::base::{DenseExtractor, Element, Matrix, Options, Selection, SparseExtractor};
use crate::error::{MatrixError, Result};

/// Compressed sparse matrix in CSR (`csr = true`) or CSC layout.
///
/// `pointers` has one more entry than the number of primary elements (rows
/// for CSR); the non-zeros of primary element `p` live in
/// `values[pointers[p]..pointers[p + 1]]` with their secondary positions in
/// the same range of `indices`.
#[derive(Debug, Clone)]
pub struct CompressedSparseMatrix<T> {
    nrow: usize,
    ncol: usize,
    values: Vec<T>,
    indices: Vec<usize>,
    pointers: Vec<usize>,
    csr: bool,
}

impl<T: Element> CompressedSparseMatrix<T> {
    /// Create a compressed sparse matrix, validating the storage if `check` is set.
    pub fn new(
        nrow: usize,
        ncol: usize,
        values: Vec<T>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
        csr: bool,
        check: bool,
    ) -> Result<Self> {
        let output = Self {
            nrow,
            ncol,
            values,
            indices,
            pointers,
            csr,
        };
        if check {
            output.validate()?;
        }
        Ok(output)
    }

    pub fn csr(
        nrow: usize,
        ncol: usize,
        values: Vec<T>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
    ) -> Result<Self> {
        Self::new(nrow, ncol, values, indices, pointers, true, true)
    }

    pub fn csc(
        nrow: usize,
        ncol: usize,
        values: Vec<T>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
    ) -> Result<Self> {
        Self::new(nrow, ncol, values, indices, pointers, false, true)
    }

    fn validate(&self) -> Result<()> {
        if self.values.len() != self.indices.len() {
            return Err(MatrixError::InvalidSparse(format!(
                "'values' and 'indices' should be of the same length ({} vs {})",
                self.values.len(),
                self.indices.len()
            )));
        }

        let primary = self.primary_len();
        if self.pointers.len() != primary + 1 {
            return Err(MatrixError::InvalidSparse(format!(
                "length of 'pointers' should be equal to {} + 1",
                if self.csr { "number of rows" } else { "number of columns" }
            )));
        }
        if self.pointers[0] != 0 {
            return Err(MatrixError::InvalidSparse(
                "first element of 'pointers' should be zero".to_string(),
            ));
        }
        if self.pointers[primary] != self.indices.len() {
            return Err(MatrixError::InvalidSparse(
                "last element of 'pointers' should be equal to length of 'indices'".to_string(),
            ));
        }
        if self.pointers.windows(2).any(|w| w[0] > w[1]) {
            return Err(MatrixError::InvalidSparse(
                "'pointers' should be in non-decreasing order".to_string(),
            ));
        }

        check_indices(
            (0..primary).map(|p| self.primary_indices(p)),
            self.secondary_len(),
        )
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn pointers(&self) -> &[usize] {
        &self.pointers
    }

    pub fn is_csr(&self) -> bool {
        self.csr
    }

    /// Number of stored non-zero elements.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl<T: Element> SparseIndices for CompressedSparseMatrix<T> {
    fn primary_len(&self) -> usize {
        if self.csr {
            self.nrow
        } else {
            self.ncol
        }
    }

    fn secondary_len(&self) -> usize {
        if self.csr {
            self.ncol
        } else {
            self.nrow
        }
    }

    fn primary_indices(&self, p: usize) -> &[usize] {
        &self.indices[self.pointers[p]..self.pointers[p + 1]]
    }
}

impl<T: Element> SparseStore<T> for CompressedSparseMatrix<T> {
    fn primary_values(&self, p: usize) -> &[T] {
        &self.values[self.pointers[p]..self.pointers[p + 1]]
    }
}

impl<T: Element> Matrix<T> for CompressedSparseMatrix<T> {
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
        self.csr
    }

    fn dense(&self, row: bool, selection: Selection, _options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        if row == self.csr {
            Box::new(PrimaryDense::new(self, selection))
        } else {
            Box::new(SecondaryDense::new(self, selection))
        }
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if row == self.csr {
            Box::new(PrimarySparse::new(self, selection, options))
        } else {
            Box::new(SecondarySparse::new(self, selection, options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4 x 5:
    // 0 1 0 0 2
    // 0 0 0 0 0
    // 3 0 4 0 0
    // 0 5 0 6 7
    fn example_csr() -> CompressedSparseMatrix<f64> {
        CompressedSparseMatrix::csr(
            4,
            5,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            vec![1, 4, 0, 2, 1, 3, 4],
            vec![0, 2, 2, 4, 7],
        )
        .unwrap()
    }

    fn example_csc() -> CompressedSparseMatrix<f64> {
        CompressedSparseMatrix::csc(
            4,
            5,
            vec![3.0, 1.0, 5.0, 4.0, 6.0, 2.0, 7.0],
            vec![2, 0, 3, 2, 3, 0, 3],
            vec![0, 1, 3, 4, 5, 7],
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        // Unsorted indices.
        assert!(CompressedSparseMatrix::csr(2, 3, vec![1.0, 2.0], vec![2, 1], vec![0, 2, 2]).is_err());
        // Out of range.
        assert!(CompressedSparseMatrix::csr(2, 3, vec![1.0], vec![3], vec![0, 1, 1]).is_err());
        // Bad pointers.
        assert!(CompressedSparseMatrix::csr(2, 3, vec![1.0], vec![0], vec![0, 1]).is_err());
        assert!(CompressedSparseMatrix::csr(2, 3, vec![1.0], vec![0], vec![0, 1, 0]).is_err());
        // Length mismatch.
        assert!(CompressedSparseMatrix::csr(2, 3, vec![1.0], vec![0, 1], vec![0, 1, 2]).is_err());
        // Unchecked construction skips all of this.
        assert!(CompressedSparseMatrix::new(2, 3, vec![1.0], vec![3], vec![0, 1, 1], true, false).is_ok());
    }

    #[test]
    fn test_primary_sparse() {
        let mat = example_csr();
        let mut vbuffer = vec![0.0; 5];
        let mut ibuffer = vec![0; 5];

        let mut ext = mat.sparse_row();
        let range = ext.fetch(3, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 3);
        assert_eq!(range.value.unwrap(), &[5.0, 6.0, 7.0]);
        assert_eq!(range.index.unwrap(), &[1, 3, 4]);

        let mut ext = mat.sparse(true, Selection::block(1, 3), &Options::default());
        let range = ext.fetch(3, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.index.unwrap(), &[1, 3]);

        let mut ext = mat.sparse(true, Selection::index(vec![0, 3, 4]), &Options::default());
        let range = ext.fetch(3, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[6.0, 7.0]);
        assert_eq!(range.index.unwrap(), &[3, 4]);

        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 0);
    }

    #[test]
    fn test_primary_dense() {
        let mat = example_csr();
        let mut buffer = vec![-1.0; 5];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(2, &mut buffer), &[3.0, 0.0, 4.0, 0.0, 0.0]);

        let mut ext = mat.dense(true, Selection::index(vec![1, 2, 4]), &Options::default());
        assert_eq!(ext.fetch(0, &mut buffer), &[1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_secondary_matches_primary() {
        let csr = example_csr();
        let csc = example_csc();
        let mut b1 = vec![0.0; 5];
        let mut b2 = vec![0.0; 5];

        // Access in a scrambled order to exercise the cursors in both directions.
        let order = [0, 4, 3, 3, 1, 2, 0, 4];
        let mut e1 = csr.dense_column();
        let mut e2 = csc.dense_column();
        for &c in &order {
            assert_eq!(e1.fetch(c, &mut b1).to_vec(), e2.fetch(c, &mut b2).to_vec());
        }

        let mut e1 = csr.dense_row();
        let mut e2 = csc.dense_row();
        for r in [3, 0, 2, 1, 3] {
            assert_eq!(e1.fetch(r, &mut b1).to_vec(), e2.fetch(r, &mut b2).to_vec());
        }
    }

    #[test]
    fn test_secondary_sparse_with_selection() {
        let csr = example_csr();
        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];
        let mut ext = csr.sparse(false, Selection::block(2, 2), &Options::default());
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[3.0]);
        assert_eq!(range.index.unwrap(), &[2]);

        let range = ext.fetch(4, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[7.0]);
        assert_eq!(range.index.unwrap(), &[3]);

        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.index.unwrap(), &[3]);
    }
}
