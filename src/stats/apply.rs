//! Drivers shared by the statistics.
//!
//! A statistic for each row (or column) is computed either "directly", by
//! extracting each row in turn, or by "running" accumulation, extracting
//! columns and updating every row's state at once. The former is used when
//! the matrix prefers access along the target dimension.

use crate::base::{Element, Matrix, Options, Selection};
use crate::error::Result;
use crate::utils::{consecutive_dense, consecutive_sparse, parallelize_into};
use num_traits::ToPrimitive;

/// Contents of one extracted row/column.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slice<'a, T> {
    Dense(&'a [T]),
    /// Structural non-zeros; `indices` are positions within the extracted range.
    Sparse { values: &'a [T], indices: &'a [usize] },
}

#[inline]
pub(crate) fn to_f64<T: ToPrimitive>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// Whether to compute the statistic for the target dimension directly.
pub(crate) fn use_direct<T: Element>(matrix: &dyn Matrix<T>, row: bool) -> bool {
    matrix.prefer_rows() == row
}

/// Compute one output per row (`row = true`) or column from its full contents.
pub(crate) fn direct<T, R, F>(matrix: &dyn Matrix<T>, row: bool, threads: usize, compute: F) -> Result<Vec<R>>
where
    T: Element,
    R: Send + Clone + Default,
    F: Fn(Slice<'_, T>) -> R + Sync,
{
    let dim = matrix.target_dim(row);
    let otherdim = matrix.non_target_dim(row);
    let sparse = matrix.is_sparse();
    let options = Options {
        sparse_ordered_index: false,
        ..Options::default()
    };

    let mut output = vec![R::default(); dim];
    parallelize_into(&mut output, threads, |start, chunk| {
        let mut vbuffer = vec![T::default(); otherdim];
        if sparse {
            let mut ibuffer = vec![0; otherdim];
            let mut ext = consecutive_sparse(matrix, row, start, chunk.len(), Selection::Full, &options);
            for out in chunk.iter_mut() {
                let range = ext.fetch(&mut vbuffer, &mut ibuffer);
                *out = compute(Slice::Sparse {
                    values: range.value.unwrap_or(&[]),
                    indices: range.index.unwrap_or(&[]),
                });
            }
        } else {
            let mut ext = consecutive_dense(matrix, row, start, chunk.len(), Selection::Full, &options);
            for out in chunk.iter_mut() {
                *out = compute(Slice::Dense(ext.fetch(&mut vbuffer)));
            }
        }
        Ok(())
    })?;
    Ok(output)
}

/// Compute one output per row (`row = true`) or column by iterating over
/// the other dimension.
///
/// Each worker covers a contiguous block of targets: `init(length)` creates
/// its state, `add` is called once per element of the other dimension with
/// the values for the block, and `finish` writes the block's outputs.
pub(crate) fn running<T, R, S, I, A, F>(
    matrix: &dyn Matrix<T>,
    row: bool,
    threads: usize,
    init: I,
    add: A,
    finish: F,
) -> Result<Vec<R>>
where
    T: Element,
    R: Send + Clone + Default,
    I: Fn(usize) -> S + Sync,
    A: Fn(&mut S, Slice<'_, T>) + Sync,
    F: Fn(S, &mut [R]) + Sync,
{
    let dim = matrix.target_dim(row);
    let otherdim = matrix.non_target_dim(row);
    let sparse = matrix.is_sparse();
    let options = Options {
        sparse_ordered_index: false,
        ..Options::default()
    };

    let mut output = vec![R::default(); dim];
    parallelize_into(&mut output, threads, |start, chunk| {
        let length = chunk.len();
        let mut state = init(length);
        let selection = Selection::block(start, length);
        let mut vbuffer = vec![T::default(); length];

        if sparse {
            let mut ibuffer = vec![0; length];
            let mut relative = vec![0; length];
            let mut ext = consecutive_sparse(matrix, !row, 0, otherdim, selection, &options);
            for _ in 0..otherdim {
                let range = ext.fetch(&mut vbuffer, &mut ibuffer);
                let indices = range.index.unwrap_or(&[]);
                for (r, &j) in relative.iter_mut().zip(indices) {
                    *r = j - start;
                }
                add(
                    &mut state,
                    Slice::Sparse {
                        values: range.value.unwrap_or(&[]),
                        indices: &relative[..indices.len()],
                    },
                );
            }
        } else {
            let mut ext = consecutive_dense(matrix, !row, 0, otherdim, selection, &options);
            for _ in 0..otherdim {
                add(&mut state, Slice::Dense(ext.fetch(&mut vbuffer)));
            }
        }

        finish(state, chunk);
        Ok(())
    })?;
    Ok(output)
}
