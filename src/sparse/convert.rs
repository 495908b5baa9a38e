//! Materializing any matrix into sparse storage.

use super::compressed::CompressedSparseMatrix;
use super::fragmented::FragmentedSparseMatrix;
use crate::base::{is_zero, Element, Matrix, Options, Selection};
use crate::error::Result;
use crate::utils::parallelize_map;
use tracing::debug;

type Fragments<T> = (Vec<Vec<T>>, Vec<Vec<usize>>);

/// Visit the non-zeros of rows/columns `start..start + length` as `(i, j, value)`.
fn for_each_nonzero<T, M, F>(
    matrix: &M,
    row: bool,
    start: usize,
    length: usize,
    mut visit: F,
) where
    T: Element,
    M: Matrix<T> + ?Sized,
    F: FnMut(usize, usize, T),
{
    let extent = matrix.non_target_dim(row);
    let mut vbuffer = vec![T::default(); extent];
    if matrix.is_sparse() {
        let mut ibuffer = vec![0usize; extent];
        let mut ext = matrix.sparse(row, Selection::Full, &Options::default());
        for i in start..start + length {
            let range = ext.fetch(i, &mut vbuffer, &mut ibuffer);
            if let (Some(values), Some(indices)) = (range.value, range.index) {
                for (&x, &j) in values.iter().zip(indices) {
                    if !is_zero(x) {
                        visit(i, j, x);
                    }
                }
            }
        }
    } else {
        let mut ext = matrix.dense(row, Selection::Full, &Options::default());
        for i in start..start + length {
            for (j, &x) in ext.fetch(i, &mut vbuffer).iter().enumerate() {
                if !is_zero(x) {
                    visit(i, j, x);
                }
            }
        }
    }
}

/// Collect the non-zeros of `matrix` into one vector per row (`row = true`)
/// or column, each with strictly increasing indices.
fn fragment<T, M>(matrix: &M, row: bool, threads: usize) -> Result<Fragments<T>>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let primary = matrix.target_dim(row);

    if matrix.prefer_rows() == row {
        let parts = parallelize_map(
            |_, start, length| {
                let mut values = vec![Vec::new(); length];
                let mut indices = vec![Vec::new(); length];
                for_each_nonzero(matrix, row, start, length, |i, j, x| {
                    values[i - start].push(x);
                    indices[i - start].push(j);
                });
                Ok((values, indices))
            },
            primary,
            threads,
        )?;

        let mut values = Vec::with_capacity(primary);
        let mut indices = Vec::with_capacity(primary);
        for (v, i) in parts {
            values.extend(v);
            indices.extend(i);
        }
        return Ok((values, indices));
    }

    // Extract along the preferred dimension; each worker covers a contiguous
    // range of secondary indices, so appending worker outputs in order keeps
    // every primary element sorted.
    debug!("Fragmenting against the preferred dimension ({} primary elements)", primary);
    let secondary = matrix.non_target_dim(row);
    let parts = parallelize_map(
        |_, start, length| {
            let mut values: Vec<Vec<T>> = vec![Vec::new(); primary];
            let mut indices: Vec<Vec<usize>> = vec![Vec::new(); primary];
            for_each_nonzero(matrix, !row, start, length, |s, p, x| {
                values[p].push(x);
                indices[p].push(s);
            });
            Ok((values, indices))
        },
        secondary,
        threads,
    )?;

    let mut values: Vec<Vec<T>> = vec![Vec::new(); primary];
    let mut indices: Vec<Vec<usize>> = vec![Vec::new(); primary];
    for (v, i) in parts {
        for (p, (pv, pi)) in v.into_iter().zip(i).enumerate() {
            values[p].extend(pv);
            indices[p].extend(pi);
        }
    }
    Ok((values, indices))
}

/// Materialize `matrix` in compressed sparse row (`csr = true`) or column format.
pub fn convert_to_compressed_sparse<T, M>(
    matrix: &M,
    csr: bool,
    threads: usize,
) -> Result<CompressedSparseMatrix<T>>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let (values, indices) = fragment(matrix, csr, threads)?;
    let total: usize = values.iter().map(|v| v.len()).sum();

    let mut pointers = Vec::with_capacity(values.len() + 1);
    pointers.push(0);
    let mut flat_values = Vec::with_capacity(total);
    let mut flat_indices = Vec::with_capacity(total);
    for (v, i) in values.into_iter().zip(indices) {
        flat_values.extend(v);
        flat_indices.extend(i);
        pointers.push(flat_values.len());
    }

    CompressedSparseMatrix::new(
        matrix.nrow(),
        matrix.ncol(),
        flat_values,
        flat_indices,
        pointers,
        csr,
        false,
    )
}

/// Materialize `matrix` as a [`FragmentedSparseMatrix`] stored by row or by column.
pub fn convert_to_fragmented_sparse<T, M>(
    matrix: &M,
    row: bool,
    threads: usize,
) -> Result<FragmentedSparseMatrix<T>>
where
    T: Element,
    M: Matrix<T> + ?Sized,
{
    let (values, indices) = fragment(matrix, row, threads)?;
    FragmentedSparseMatrix::new(matrix.nrow(), matrix.ncol(), values, indices, row, false)
}
