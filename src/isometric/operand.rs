//! The second argument of a unary isometric operation: one scalar for the
//! whole matrix, or one value per row or per column.

use crate::base::Selection;
use crate::error::{MatrixError, Result};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Operand<S> {
    Scalar(S),
    /// `values[r]` applies to row `r` when `by_row`, otherwise `values[c]` to column `c`.
    Vector { values: Arc<Vec<S>>, by_row: bool },
}

impl<S: Copy> Operand<S> {
    pub fn vector(values: Vec<S>, by_row: bool) -> Self {
        Operand::Vector {
            values: Arc::new(values),
            by_row,
        }
    }

    /// The single value used for all of row/column `i` along `row`, if there is one.
    #[inline]
    pub(crate) fn along(&self, row: bool, i: usize) -> Option<S> {
        match self {
            Operand::Scalar(s) => Some(*s),
            Operand::Vector { values, by_row } if *by_row == row => Some(values[i]),
            Operand::Vector { .. } => None,
        }
    }

    /// Whether `pred` holds for every value.
    pub(crate) fn all<F: Fn(S) -> bool>(&self, pred: F) -> bool {
        match self {
            Operand::Scalar(s) => pred(*s),
            Operand::Vector { values, .. } => values.iter().all(|&s| pred(s)),
        }
    }

    pub(crate) fn depends_on_row(&self) -> bool {
        matches!(self, Operand::Vector { by_row: true, .. })
    }

    pub(crate) fn depends_on_column(&self) -> bool {
        matches!(self, Operand::Vector { by_row: false, .. })
    }

    /// Required number of rows, for per-row vectors.
    pub(crate) fn nrow(&self) -> Option<usize> {
        match self {
            Operand::Vector { values, by_row: true } => Some(values.len()),
            _ => None,
        }
    }

    /// Required number of columns, for per-column vectors.
    pub(crate) fn ncol(&self) -> Option<usize> {
        match self {
            Operand::Vector { values, by_row: false } => Some(values.len()),
            _ => None,
        }
    }

    /// Apply `f(x, s)` in place to the selected elements of row/column `i`.
    pub(crate) fn apply_dense<T, F>(&self, row: bool, i: usize, selection: &Selection, values: &mut [T], f: F)
    where
        T: Copy,
        F: Fn(T, S) -> T,
    {
        match self {
            Operand::Vector { values: vector, by_row } if *by_row != row => {
                let full = values.len();
                for (v, j) in values.iter_mut().zip(selection.iter(full)) {
                    *v = f(*v, vector[j]);
                }
            }
            Operand::Vector { values: vector, .. } => fill_with(values, vector[i], f),
            Operand::Scalar(s) => fill_with(values, *s, f),
        }
    }

    /// Apply `f(x, s)` in place to structural non-zeros at positions `indices`.
    ///
    /// `indices` may be empty when the operand does not vary across them.
    pub(crate) fn apply_sparse<T, F>(&self, row: bool, i: usize, values: &mut [T], indices: &[usize], f: F)
    where
        T: Copy,
        F: Fn(T, S) -> T,
    {
        match self {
            Operand::Vector { values: vector, by_row } if *by_row != row => {
                for (v, &j) in values.iter_mut().zip(indices) {
                    *v = f(*v, vector[j]);
                }
            }
            Operand::Vector { values: vector, .. } => fill_with(values, vector[i], f),
            Operand::Scalar(s) => fill_with(values, *s, f),
        }
    }
}

#[inline]
fn fill_with<T: Copy, S: Copy, F: Fn(T, S) -> T>(values: &mut [T], s: S, f: F) {
    for v in values.iter_mut() {
        *v = f(*v, s);
    }
}

/// Check that an operation's vector lengths agree with the matrix it wraps.
pub(crate) fn check_extent(expected: Option<usize>, actual: usize, what: &str) -> Result<()> {
    match expected {
        Some(n) if n != actual => Err(MatrixError::DimensionMismatch(format!(
            "length of the operation vector ({}) should equal the number of {} ({})",
            n, what, actual
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_along_and_dense() {
        let op = Operand::vector(vec![10, 20, 30], false);
        assert_eq!(op.along(false, 1), Some(20));
        assert_eq!(op.along(true, 1), None);
        assert!(op.depends_on_column());
        assert_eq!(op.ncol(), Some(3));
        assert_eq!(op.nrow(), None);

        let mut values = vec![1, 2];
        op.apply_dense(true, 0, &Selection::index(vec![0, 2]), &mut values, |x, s| x + s);
        assert_eq!(values, vec![11, 32]);

        let mut values = vec![1, 2];
        op.apply_dense(true, 0, &Selection::block(1, 2), &mut values, |x, s| x + s);
        assert_eq!(values, vec![21, 32]);

        let mut values = vec![5];
        op.apply_sparse(true, 0, &mut values, &[1], |x, s| x * s);
        assert_eq!(values, vec![100]);
    }

    #[test]
    fn test_check_extent() {
        assert!(check_extent(Some(3), 3, "rows").is_ok());
        assert!(check_extent(None, 7, "rows").is_ok());
        assert!(check_extent(Some(2), 3, "columns").is_err());
    }
}
