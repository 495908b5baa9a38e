//! Counting elements that satisfy a predicate.
//!
//! For sparse matrices the predicate is evaluated on zero once, and that
//! result stands for every implicit zero.

use super::apply::{direct, running, use_direct, Slice};
use crate::base::{is_zero, Element, Matrix};
use crate::config::StatsConfig;
use crate::error::Result;
use num_traits::Float;

/// Number of elements in each row (`row = true`) or column satisfying `pred`.
fn counts<T, P>(matrix: &dyn Matrix<T>, row: bool, threads: usize, pred: P) -> Result<Vec<usize>>
where
    T: Element,
    P: Fn(T) -> bool + Sync,
{
    let otherdim = matrix.non_target_dim(row);
    let zero_counts = pred(T::default());

    if use_direct(matrix, row) {
        return direct(matrix, row, threads, |slice| match slice {
            Slice::Dense(v) => v.iter().filter(|&&x| pred(x)).count(),
            Slice::Sparse { values, .. } => {
                let hits = values.iter().filter(|&&x| pred(x)).count();
                if zero_counts {
                    hits + otherdim - values.len()
                } else {
                    hits
                }
            }
        });
    }

    running(
        matrix,
        row,
        threads,
        |n| (vec![0usize; n], vec![0usize; n], 0usize),
        |(hits, visited, seen): &mut (Vec<usize>, Vec<usize>, usize), slice| {
            *seen += 1;
            match slice {
                Slice::Dense(v) => {
                    for ((h, seen_here), &x) in hits.iter_mut().zip(visited.iter_mut()).zip(v) {
                        *h += usize::from(pred(x));
                        *seen_here += 1;
                    }
                }
                Slice::Sparse { values, indices } => {
                    for (&x, &j) in values.iter().zip(indices) {
                        hits[j] += usize::from(pred(x));
                        visited[j] += 1;
                    }
                }
            }
        },
        |(hits, visited, seen), out| {
            for ((o, h), v) in out.iter_mut().zip(hits).zip(visited) {
                *o = if zero_counts { h + seen - v } else { h };
            }
        },
    )
}

/// Number of elements in each row satisfying `pred`.
pub fn row_counts<T, P>(matrix: &dyn Matrix<T>, config: &StatsConfig, pred: P) -> Result<Vec<usize>>
where
    T: Element,
    P: Fn(T) -> bool + Sync,
{
    counts(matrix, true, config.num_threads, pred)
}

/// Number of elements in each column satisfying `pred`.
pub fn column_counts<T, P>(matrix: &dyn Matrix<T>, config: &StatsConfig, pred: P) -> Result<Vec<usize>>
where
    T: Element,
    P: Fn(T) -> bool + Sync,
{
    counts(matrix, false, config.num_threads, pred)
}

pub fn row_nan_counts<T: Element + Float>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<usize>> {
    row_counts(matrix, config, |x: T| x.is_nan())
}

pub fn column_nan_counts<T: Element + Float>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<usize>> {
    column_counts(matrix, config, |x: T| x.is_nan())
}

pub fn row_zero_counts<T: Element>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<usize>> {
    row_counts(matrix, config, is_zero)
}

pub fn column_zero_counts<T: Element>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<usize>> {
    column_counts(matrix, config, is_zero)
}
