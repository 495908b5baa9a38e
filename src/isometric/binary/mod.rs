//! Delayed element-wise operations between two matrices of the same shape.

pub mod operations;

pub use operations::{BinaryArithmeticHelper, BinaryBooleanHelper, BinaryCompareHelper};

use crate::base::{
    is_zero, DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix, SparseExtractor,
    SparseRange,
};
use crate::dense::SparsifiedWrapper;
use crate::error::{MatrixError, Result};
use std::sync::Arc;

/// Combines corresponding elements of the left and right matrices.
pub trait BinaryOperation<T: Element>: Send + Sync {
    fn apply(&self, left: T, right: T) -> T;

    /// Whether two structural zeros combine to zero.
    fn is_sparse(&self) -> bool {
        is_zero(self.apply(T::default(), T::default()))
    }
}

pub struct DelayedBinaryIsometric<T: Element, Op> {
    left: SharedMatrix<T>,
    right: SharedMatrix<T>,
    op: Op,
}

impl<T: Element, Op: BinaryOperation<T>> DelayedBinaryIsometric<T, Op> {
    pub fn new(left: SharedMatrix<T>, right: SharedMatrix<T>, op: Op) -> Result<Self> {
        if left.nrow() != right.nrow() || left.ncol() != right.ncol() {
            return Err(MatrixError::DimensionMismatch(format!(
                "left matrix is {}x{} but right matrix is {}x{}",
                left.nrow(),
                left.ncol(),
                right.nrow(),
                right.ncol()
            )));
        }
        Ok(Self { left, right, op })
    }

    pub fn operation(&self) -> &Op {
        &self.op
    }
}

pub fn make_delayed_binary<T, Op>(
    left: SharedMatrix<T>,
    right: SharedMatrix<T>,
    op: Op,
) -> Result<SharedMatrix<T>>
where
    T: Element,
    Op: BinaryOperation<T> + 'static,
{
    Ok(Arc::new(DelayedBinaryIsometric::new(left, right, op)?))
}

struct BinaryDense<'a, T, Op> {
    left: Box<dyn DenseExtractor<T> + 'a>,
    right: Box<dyn DenseExtractor<T> + 'a>,
    op: &'a Op,
    lholding: Vec<T>,
    rholding: Vec<T>,
}

impl<T: Element, Op: BinaryOperation<T>> DenseExtractor<T> for BinaryDense<'_, T, Op> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let lvals = self.left.fetch(i, &mut self.lholding);
        let rvals = self.right.fetch(i, &mut self.rholding);
        let out = &mut buffer[..lvals.len()];
        for ((o, &l), &r) in out.iter_mut().zip(lvals).zip(rvals) {
            *o = self.op.apply(l, r);
        }
        out
    }
}

/// Merges the ordered non-zeros of both sides; a position present on only
/// one side is combined with a zero from the other.
struct BinarySparse<'a, T, Op> {
    left: Box<dyn SparseExtractor<T> + 'a>,
    right: Box<dyn SparseExtractor<T> + 'a>,
    op: &'a Op,
    lvholding: Vec<T>,
    liholding: Vec<usize>,
    rvholding: Vec<T>,
    riholding: Vec<usize>,
    iwork: Vec<usize>,
    extract_value: bool,
    extract_index: bool,
}

impl<T: Element, Op: BinaryOperation<T>> SparseExtractor<T> for BinarySparse<'_, T, Op> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let lrange = self.left.fetch(i, &mut self.lvholding, &mut self.liholding);
        let rrange = self.right.fetch(i, &mut self.rvholding, &mut self.riholding);
        let lidx = lrange.index.unwrap_or(&[]);
        let ridx = rrange.index.unwrap_or(&[]);
        let zero = T::default();
        let lval = |k: usize| lrange.value.map_or(zero, |v| v[k]);
        let rval = |k: usize| rrange.value.map_or(zero, |v| v[k]);

        let (mut a, mut b, mut n) = (0, 0, 0);
        while a < lidx.len() || b < ridx.len() {
            let take_left = b == ridx.len() || (a < lidx.len() && lidx[a] <= ridx[b]);
            let take_right = a == lidx.len() || (b < ridx.len() && ridx[b] <= lidx[a]);
            let (position, value) = if take_left && take_right {
                let out = (lidx[a], self.op.apply(lval(a), rval(b)));
                a += 1;
                b += 1;
                out
            } else if take_left {
                let out = (lidx[a], self.op.apply(lval(a), zero));
                a += 1;
                out
            } else {
                let out = (ridx[b], self.op.apply(zero, rval(b)));
                b += 1;
                out
            };
            if self.extract_value {
                vbuffer[n] = value;
            }
            self.iwork[n] = position;
            n += 1;
        }

        let value = if self.extract_value { Some(&vbuffer[..n]) } else { None };
        let index = if self.extract_index {
            let out = &mut ibuffer[..n];
            out.copy_from_slice(&self.iwork[..n]);
            Some(&*out)
        } else {
            None
        };
        SparseRange::new(n, value, index)
    }
}

impl<T: Element, Op: BinaryOperation<T>> Matrix<T> for DelayedBinaryIsometric<T, Op> {
    fn nrow(&self) -> usize {
        self.left.nrow()
    }

    fn ncol(&self) -> usize {
        self.left.ncol()
    }

    fn is_sparse(&self) -> bool {
        self.op.is_sparse() && self.left.is_sparse() && self.right.is_sparse()
    }

    fn is_sparse_proportion(&self) -> f64 {
        if self.op.is_sparse() {
            (self.left.is_sparse_proportion() + self.right.is_sparse_proportion()) / 2.0
        } else {
            0.0
        }
    }

    fn prefer_rows(&self) -> bool {
        self.prefer_rows_proportion() > 0.5
    }

    fn prefer_rows_proportion(&self) -> f64 {
        (self.left.prefer_rows_proportion() + self.right.prefer_rows_proportion()) / 2.0
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.left.uses_oracle(row) || self.right.uses_oracle(row)
    }

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        let extent = selection.extent(self.left.non_target_dim(row));
        Box::new(BinaryDense {
            left: self.left.dense(row, selection.clone(), options),
            right: self.right.dense(row, selection, options),
            op: &self.op,
            lholding: vec![T::default(); extent],
            rholding: vec![T::default(); extent],
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        let full = self.left.non_target_dim(row);
        if !self.is_sparse() {
            let dense = self.dense(row, selection.clone(), options);
            return Box::new(SparsifiedWrapper::new(dense, &selection, full, options));
        }

        let extent = selection.extent(full);
        let inner_options = Options {
            sparse_extract_value: options.sparse_extract_value,
            sparse_extract_index: true,
            sparse_ordered_index: true,
        };
        let vlen = if options.sparse_extract_value { extent } else { 0 };
        Box::new(BinarySparse {
            left: self.left.sparse(row, selection.clone(), &inner_options),
            right: self.right.sparse(row, selection, &inner_options),
            op: &self.op,
            lvholding: vec![T::default(); vlen],
            liholding: vec![0; extent],
            rvholding: vec![T::default(); vlen],
            riholding: vec![0; extent],
            iwork: vec![0; extent],
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::isometric::{ArithmeticOp, CompareOp};
    use crate::sparse::CompressedSparseMatrix;

    // 2 x 4:
    // 1 0 2 0
    // 0 3 0 0
    fn left() -> SharedMatrix<f64> {
        Arc::new(
            CompressedSparseMatrix::csr(2, 4, vec![1.0, 2.0, 3.0], vec![0, 2, 1], vec![0, 2, 3]).unwrap(),
        )
    }

    // 2 x 4:
    // 0 0 5 7
    // 0 -3 0 0
    fn right() -> SharedMatrix<f64> {
        Arc::new(
            CompressedSparseMatrix::csc(2, 4, vec![-3.0, 5.0, 7.0], vec![1, 0, 0], vec![0, 0, 1, 2, 3]).unwrap(),
        )
    }

    #[test]
    fn test_dimension_mismatch() {
        let other: SharedMatrix<f64> = Arc::new(DenseMatrix::new(4, 2, vec![0.0; 8], true).unwrap());
        let op = BinaryArithmeticHelper::new(ArithmeticOp::Add);
        assert!(DelayedBinaryIsometric::new(left(), other, op).is_err());
    }

    #[test]
    fn test_dense_and_sparse_add() {
        let mat = DelayedBinaryIsometric::new(left(), right(), BinaryArithmeticHelper::new(ArithmeticOp::Add)).unwrap();
        assert!(mat.is_sparse());

        let mut buffer = vec![0.0; 4];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(0, &mut buffer), &[1.0, 0.0, 7.0, 7.0]);
        assert_eq!(ext.fetch(1, &mut buffer), &[0.0, 0.0, 0.0, 0.0]);

        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];
        let mut ext = mat.sparse_row();
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.index.unwrap(), &[0, 2, 3]);
        assert_eq!(range.value.unwrap(), &[1.0, 7.0, 7.0]);

        // 3 + -3 is a structural non-zero holding zero.
        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.index.unwrap(), &[1]);
        assert_eq!(range.value.unwrap(), &[0.0]);

        let mut ext = mat.sparse(false, Selection::index(vec![0, 1]), &Options::default());
        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.index.unwrap(), &[1]);
        assert_eq!(range.value.unwrap(), &[0.0]);
    }

    #[test]
    fn test_indices_only() {
        let mat = DelayedBinaryIsometric::new(left(), right(), BinaryArithmeticHelper::new(ArithmeticOp::Multiply)).unwrap();
        let opts = Options {
            sparse_extract_value: false,
            ..Options::default()
        };
        let mut vbuffer: Vec<f64> = Vec::new();
        let mut ibuffer = vec![0; 4];
        let mut ext = mat.sparse(true, Selection::block(1, 3), &opts);
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 2);
        assert!(range.value.is_none());
        assert_eq!(range.index.unwrap(), &[2, 3]);
    }

    #[test]
    fn test_non_sparse_operation() {
        let mat = DelayedBinaryIsometric::new(left(), right(), BinaryCompareHelper::new(CompareOp::Equal)).unwrap();
        assert!(!mat.is_sparse());
        let mut buffer = vec![0.0; 2];
        let mut ext = mat.dense_column();
        assert_eq!(ext.fetch(2, &mut buffer), &[0.0, 1.0]);

        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];
        let mut ext = mat.sparse_row();
        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 4);
        assert_eq!(range.value.unwrap(), &[1.0, 0.0, 1.0, 1.0]);
    }
}
