//! Materializing any matrix into a dense array.

use super::dense_matrix::DenseMatrix;
use super::transpose::transpose;
use crate::base::{Element, Matrix, Options, Selection};
use crate::error::Result;
use crate::utils::parallelize_blocks;
use tracing::debug;

/// Fill `output` (laid out with one contiguous block of `secondary` elements
/// per row/column) by extracting along `row`.
pub(crate) fn fill_primary<T, M>(
    matrix: &M,
    row: bool,
    secondary: usize,
    threads: usize,
    output: &mut [T],
) -> Result<()>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let sparse = matrix.is_sparse();
    parallelize_blocks(output, secondary, threads, |start, chunk| {
        let opts = Options::default();
        let mut vbuffer = vec![T::default(); secondary];
        if sparse {
            let mut ibuffer = vec![0usize; secondary];
            let mut ext = matrix.sparse(row, Selection::Full, &opts);
            for (k, dest) in chunk.chunks_mut(secondary).enumerate() {
                let range = ext.fetch(start + k, &mut vbuffer, &mut ibuffer);
                if let (Some(values), Some(indices)) = (range.value, range.index) {
                    for (&x, &j) in values.iter().zip(indices) {
                        dest[j] = x;
                    }
                }
            }
        } else {
            let mut ext = matrix.dense(row, Selection::Full, &opts);
            for (k, dest) in chunk.chunks_mut(secondary).enumerate() {
                dest.copy_from_slice(ext.fetch(start + k, &mut vbuffer));
            }
        }
        Ok(())
    })
}

/// Copy the contents of `matrix` into a row-major or column-major vector.
pub fn convert_to_dense_vec<T, M>(matrix: &M, row_major: bool, threads: usize) -> Result<Vec<T>>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let (nrow, ncol) = (matrix.nrow(), matrix.ncol());
    let mut output = vec![T::default(); nrow * ncol];
    if output.is_empty() {
        return Ok(output);
    }

    let prefer_rows = matrix.prefer_rows();
    if prefer_rows == row_major {
        let secondary = if row_major { ncol } else { nrow };
        fill_primary(matrix, row_major, secondary, threads, &mut output)?;
    } else {
        // Extract along the preferred dimension, then transpose into place.
        debug!("Converting to dense via transposition ({} x {})", nrow, ncol);
        let (primary, secondary) = if prefer_rows { (nrow, ncol) } else { (ncol, nrow) };
        let mut temp = vec![T::default(); nrow * ncol];
        fill_primary(matrix, prefer_rows, secondary, threads, &mut temp)?;
        transpose(&temp, primary, secondary, &mut output);
    }
    Ok(output)
}

/// Materialize `matrix` as a [`DenseMatrix`].
pub fn convert_to_dense<T, M>(matrix: &M, row_major: bool, threads: usize) -> Result<DenseMatrix<T>>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let values = convert_to_dense_vec(matrix, row_major, threads)?;
    DenseMatrix::new(matrix.nrow(), matrix.ncol(), values, row_major)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_both_layouts() {
        let values: Vec<f64> = (0..20).map(|x| x as f64 * 0.5).collect();
        let mat = DenseMatrix::row_major(4, 5, values.clone()).unwrap();

        let same = convert_to_dense_vec(&mat, true, 1).unwrap();
        assert_eq!(same, values);

        let flipped = convert_to_dense(&mat, false, 3).unwrap();
        assert!(!flipped.is_row_major());
        let mut buffer = vec![0.0; 5];
        let mut ext = flipped.dense_row();
        assert_eq!(ext.fetch(2, &mut buffer), &values[10..15]);
    }

    #[test]
    fn test_empty_matrix() {
        let mat = DenseMatrix::<f64>::row_major(0, 3, vec![]).unwrap();
        let out = convert_to_dense(&mat, true, 2).unwrap();
        assert_eq!(out.nrow(), 0);
        assert_eq!(out.ncol(), 3);
    }
}
