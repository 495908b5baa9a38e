//! Helpers for walking contiguous runs of rows/columns.

use crate::base::{
    ConsecutiveOracle, Element, Matrix, OracularDenseExtractor, OracularSparseExtractor, Options,
    Selection,
};
use std::sync::Arc;

/// Oracular dense extractor over rows/columns `[start, start + length)`.
pub fn consecutive_dense<'a, T: Element, M: Matrix<T> + ?Sized>(
    matrix: &'a M,
    row: bool,
    start: usize,
    length: usize,
    selection: Selection,
    options: &Options,
) -> Box<dyn OracularDenseExtractor<T> + 'a> {
    matrix.dense_oracular(row, Arc::new(ConsecutiveOracle::new(start, length)), selection, options)
}

/// Oracular sparse extractor over rows/columns `[start, start + length)`.
pub fn consecutive_sparse<'a, T: Element, M: Matrix<T> + ?Sized>(
    matrix: &'a M,
    row: bool,
    start: usize,
    length: usize,
    selection: Selection,
    options: &Options,
) -> Box<dyn OracularSparseExtractor<T> + 'a> {
    matrix.sparse_oracular(row, Arc::new(ConsecutiveOracle::new(start, length)), selection, options)
}

/// Call `fun(start, length)` for each run of consecutive values in sorted `indices`.
pub fn process_consecutive_indices<F>(indices: &[usize], mut fun: F)
where
    F: FnMut(usize, usize),
{
    let mut i = 0;
    while i < indices.len() {
        let start = indices[i];
        let mut length = 1;
        while i + length < indices.len() && indices[i + length] == start + length {
            length += 1;
        }
        fun(start, length);
        i += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;

    #[test]
    fn test_process_consecutive_indices() {
        let mut runs = Vec::new();
        process_consecutive_indices(&[0, 1, 2, 5, 7, 8], |s, l| runs.push((s, l)));
        assert_eq!(runs, vec![(0, 3), (5, 1), (7, 2)]);

        let mut runs = Vec::new();
        process_consecutive_indices(&[], |s, l| runs.push((s, l)));
        assert!(runs.is_empty());
    }

    #[test]
    fn test_consecutive_dense() {
        let mat = DenseMatrix::row_major(4, 2, (0..8).map(|x| x as f64).collect()).unwrap();
        let mut ext = consecutive_dense(&mat, true, 1, 2, Selection::Full, &Options::default());
        let mut buffer = vec![0.0; 2];
        assert_eq!(ext.fetch(&mut buffer), &[2.0, 3.0]);
        assert_eq!(ext.fetch(&mut buffer), &[4.0, 5.0]);
    }
}
