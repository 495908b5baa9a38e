//! Delayed element-wise operations on a single matrix
//!
//! - Arithmetic: +, -, *, /, power, modulo, integer division with a scalar or vector
//! - Compare: comparisons with a scalar or vector, and NaN/infinity tests
//! - Boolean: logical operations treating non-zero as true
//! - Math: abs, sign, logarithms, rounding, exponentials and trigonometry
//! - Substitute: replacing values that satisfy a comparison

pub mod arithmetic;
pub mod boolean;
pub mod compare;
pub mod math;
pub mod substitute;

pub use arithmetic::ArithmeticHelper;
pub use boolean::{BooleanHelper, BooleanNotHelper};
pub use compare::{CompareHelper, SpecialCompareHelper};
pub use math::{MathFunction, MathHelper};
pub use substitute::{SpecialSubstituteHelper, SubstituteHelper};

use super::operand::check_extent;
use crate::base::{
    DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix, SparseExtractor,
    SparseRange,
};
use crate::dense::SparsifiedWrapper;
use crate::error::Result;
use std::sync::Arc;

/// An element-wise operation, possibly varying by row or column.
///
/// `row` is the direction of extraction and `i` the row/column being
/// extracted. All methods transform `values` in place.
pub trait UnaryOperation<T>: Send + Sync {
    /// Transform the selected elements of row/column `i`.
    fn dense(&self, row: bool, i: usize, selection: &Selection, values: &mut [T]);

    /// Transform the structural non-zeros of row/column `i`, located at
    /// `indices` along the other dimension. `indices` is empty unless the
    /// operation depends on the position along the other dimension.
    fn sparse(&self, row: bool, i: usize, values: &mut [T], indices: &[usize]);

    /// Result of the operation on a structural zero in row/column `i`.
    /// Only meaningful when it does not vary along the other dimension.
    fn fill(&self, row: bool, i: usize) -> T;

    /// Whether zero always maps to zero.
    fn is_sparse(&self) -> bool;

    fn zero_depends_on_row(&self) -> bool {
        false
    }

    fn zero_depends_on_column(&self) -> bool {
        false
    }

    fn non_zero_depends_on_row(&self) -> bool {
        false
    }

    fn non_zero_depends_on_column(&self) -> bool {
        false
    }

    /// Number of rows the operation was built for, if constrained.
    fn nrow(&self) -> Option<usize> {
        None
    }

    /// Number of columns the operation was built for, if constrained.
    fn ncol(&self) -> Option<usize> {
        None
    }
}

/// Applies a [`UnaryOperation`] to each element of the inner matrix as it is extracted.
pub struct DelayedUnaryIsometric<T: Element, Op> {
    inner: SharedMatrix<T>,
    op: Op,
}

impl<T: Element, Op: UnaryOperation<T>> DelayedUnaryIsometric<T, Op> {
    pub fn new(inner: SharedMatrix<T>, op: Op) -> Result<Self> {
        check_extent(op.nrow(), inner.nrow(), "rows")?;
        check_extent(op.ncol(), inner.ncol(), "columns")?;
        Ok(Self { inner, op })
    }

    pub fn operation(&self) -> &Op {
        &self.op
    }
}

/// Shared-handle constructor for [`DelayedUnaryIsometric`].
pub fn make_delayed_unary<T, Op>(inner: SharedMatrix<T>, op: Op) -> Result<SharedMatrix<T>>
where
    T: Element,
    Op: UnaryOperation<T> + 'static,
{
    Ok(Arc::new(DelayedUnaryIsometric::new(inner, op)?))
}

struct BasicDense<'a, T, Op> {
    inner: Box<dyn DenseExtractor<T> + 'a>,
    op: &'a Op,
    row: bool,
    selection: Selection,
    holding: Vec<T>,
}

impl<T: Element, Op: UnaryOperation<T>> DenseExtractor<T> for BasicDense<'_, T, Op> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let src = self.inner.fetch(i, &mut self.holding);
        let out = &mut buffer[..src.len()];
        out.copy_from_slice(src);
        self.op.dense(self.row, i, &self.selection, out);
        out
    }
}

/// Dense extraction from a sparse inner matrix with a sparsity-preserving
/// operation: only the non-zeros are transformed, everything else is the fill value.
struct ExpandedDense<'a, T, Op> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    op: &'a Op,
    row: bool,
    selection: Selection,
    extent: usize,
    vholding: Vec<T>,
    iholding: Vec<usize>,
    work: Vec<T>,
}

impl<T: Element, Op: UnaryOperation<T>> DenseExtractor<T> for ExpandedDense<'_, T, Op> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let range = self.inner.fetch(i, &mut self.vholding, &mut self.iholding);
        let out = &mut buffer[..self.extent];
        out.fill(self.op.fill(self.row, i));

        if let (Some(values), Some(indices)) = (range.value, range.index) {
            let work = &mut self.work[..range.number];
            work.copy_from_slice(values);
            self.op.sparse(self.row, i, work, indices);

            match &self.selection {
                Selection::Full => {
                    for (&x, &j) in work.iter().zip(indices) {
                        out[j] = x;
                    }
                }
                Selection::Block { start, .. } => {
                    for (&x, &j) in work.iter().zip(indices) {
                        out[j - start] = x;
                    }
                }
                Selection::Index(wanted) => {
                    for (&x, &j) in work.iter().zip(indices) {
                        if let Ok(k) = wanted.binary_search(&j) {
                            out[k] = x;
                        }
                    }
                }
            }
        }
        out
    }
}

/// Sparse extraction with a sparsity-preserving operation.
struct SimpleSparse<'a, T, Op> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    op: &'a Op,
    row: bool,
    vholding: Vec<T>,
    iholding: Vec<usize>,
    /// Whether the caller asked for indices (they may be extracted regardless).
    report_index: bool,
    /// Whether the operation needs the indices.
    needs_index: bool,
}

impl<T: Element, Op: UnaryOperation<T>> SparseExtractor<T> for SimpleSparse<'_, T, Op> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let ib: &'b mut [usize] = if self.report_index {
            ibuffer
        } else {
            &mut self.iholding
        };
        let range = self.inner.fetch(i, &mut self.vholding, ib);

        let value = match range.value {
            Some(src) => {
                let out = &mut vbuffer[..src.len()];
                out.copy_from_slice(src);
                let indices: &[usize] = if self.needs_index {
                    range.index.unwrap_or(&[])
                } else {
                    &[]
                };
                self.op.sparse(self.row, i, out, indices);
                Some(&*out)
            }
            None => None,
        };

        let index = if self.report_index { range.index } else { None };
        SparseRange::new(range.number, value, index)
    }
}

impl<T: Element, Op: UnaryOperation<T>> Matrix<T> for DelayedUnaryIsometric<T, Op> {
    fn nrow(&self) -> usize {
        self.inner.nrow()
    }

    fn ncol(&self) -> usize {
        self.inner.ncol()
    }

    fn is_sparse(&self) -> bool {
        self.op.is_sparse() && self.inner.is_sparse()
    }

    fn is_sparse_proportion(&self) -> f64 {
        if self.op.is_sparse() {
            self.inner.is_sparse_proportion()
        } else {
            0.0
        }
    }

    fn prefer_rows(&self) -> bool {
        self.inner.prefer_rows()
    }

    fn prefer_rows_proportion(&self) -> f64 {
        self.inner.prefer_rows_proportion()
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.inner.uses_oracle(row)
    }

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        let extent = selection.extent(self.inner.non_target_dim(row));

        if self.inner.is_sparse() && self.op.is_sparse() {
            let opts = Options {
                sparse_extract_value: true,
                sparse_extract_index: true,
                sparse_ordered_index: false,
            };
            return Box::new(ExpandedDense {
                inner: self.inner.sparse(row, selection.clone(), &opts),
                op: &self.op,
                row,
                selection,
                extent,
                vholding: vec![T::default(); extent],
                iholding: vec![0; extent],
                work: vec![T::default(); extent],
            });
        }

        Box::new(BasicDense {
            inner: self.inner.dense(row, selection.clone(), options),
            op: &self.op,
            row,
            selection,
            holding: vec![T::default(); extent],
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        let full = self.inner.non_target_dim(row);
        if !self.op.is_sparse() {
            let dense = self.dense(row, selection.clone(), options);
            return Box::new(SparsifiedWrapper::new(dense, &selection, full, options));
        }

        let extent = selection.extent(full);
        let needs_index = options.sparse_extract_value
            && if row {
                self.op.non_zero_depends_on_column()
            } else {
                self.op.non_zero_depends_on_row()
            };
        let mut inner_options = *options;
        inner_options.sparse_extract_index = options.sparse_extract_index || needs_index;

        Box::new(SimpleSparse {
            inner: self.inner.sparse(row, selection, &inner_options),
            op: &self.op,
            row,
            vholding: vec![T::default(); if options.sparse_extract_value { extent } else { 0 }],
            iholding: vec![0; if needs_index && !options.sparse_extract_index { extent } else { 0 }],
            report_index: options.sparse_extract_index,
            needs_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isometric::{ArithmeticOp, CompareOp};
    use crate::sparse::CompressedSparseMatrix;

    // 3 x 4:
    // 1 0 2 0
    // 0 0 0 3
    // 4 0 0 5
    fn example() -> SharedMatrix<f64> {
        Arc::new(
            CompressedSparseMatrix::csr(
                3,
                4,
                vec![1.0, 2.0, 3.0, 4.0, 5.0],
                vec![0, 2, 3, 0, 3],
                vec![0, 2, 3, 5],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_vector_length_checked() {
        let op = ArithmeticHelper::vector(ArithmeticOp::Add, true, vec![1.0, 2.0], true);
        assert!(DelayedUnaryIsometric::new(example(), op).is_err());
        let op = ArithmeticHelper::vector(ArithmeticOp::Add, true, vec![1.0, 2.0, 3.0, 4.0], false);
        assert!(DelayedUnaryIsometric::new(example(), op).is_ok());
    }

    #[test]
    fn test_sparse_preserving_column_vector() {
        let op = ArithmeticHelper::vector(ArithmeticOp::Multiply, true, vec![1.0, 10.0, 100.0, 1000.0], false);
        let mat = DelayedUnaryIsometric::new(example(), op).unwrap();
        assert!(mat.is_sparse());

        let mut buffer = vec![0.0; 4];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(2, &mut buffer), &[4.0, 0.0, 0.0, 5000.0]);

        let mut ext = mat.dense(true, Selection::index(vec![2, 3]), &Options::default());
        assert_eq!(ext.fetch(0, &mut buffer), &[200.0, 0.0]);

        let mut ext = mat.dense_column();
        assert_eq!(ext.fetch(3, &mut buffer), &[0.0, 3000.0, 5000.0]);

        // Values without indices still need the positions internally.
        let opts = Options {
            sparse_extract_index: false,
            ..Options::default()
        };
        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer: Vec<usize> = Vec::new();
        let mut ext = mat.sparse(true, Selection::Full, &opts);
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[1.0, 200.0]);
        assert!(range.index.is_none());
    }

    #[test]
    fn test_non_sparse_operation() {
        let op = ArithmeticHelper::scalar(ArithmeticOp::Add, true, 1.0);
        let mat = DelayedUnaryIsometric::new(example(), op).unwrap();
        assert!(!mat.is_sparse());

        let mut buffer = vec![0.0; 4];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(1, &mut buffer), &[1.0, 1.0, 1.0, 4.0]);

        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];
        let mut ext = mat.sparse(false, Selection::block(1, 2), &Options::default());
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 2);
        assert_eq!(range.value.unwrap(), &[1.0, 5.0]);
        assert_eq!(range.index.unwrap(), &[1, 2]);
    }

    #[test]
    fn test_row_vector_along_rows() {
        let op = ArithmeticHelper::vector(ArithmeticOp::Subtract, false, vec![1.0, 2.0, 3.0], true);
        let mat = DelayedUnaryIsometric::new(example(), op).unwrap();
        // s - x is not sparse unless s is zero.
        assert!(!mat.is_sparse());
        let mut buffer = vec![0.0; 4];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(2, &mut buffer), &[-1.0, 3.0, 3.0, -2.0]);
    }

    #[test]
    fn test_integer_matrix() {
        let counts: SharedMatrix<i32> = Arc::new(
            CompressedSparseMatrix::csr(3, 4, vec![1, 2, 3, 4, 5], vec![0, 2, 3, 0, 3], vec![0, 2, 3, 5]).unwrap(),
        );
        let mat = DelayedUnaryIsometric::new(counts, CompareHelper::scalar(CompareOp::GreaterThan, 2)).unwrap();
        assert!(mat.is_sparse());

        let mut buffer = vec![0; 4];
        let mut ext = mat.dense_row();
        assert_eq!(ext.fetch(2, &mut buffer), &[1, 0, 0, 1]);

        let mut vbuffer = vec![0; 3];
        let mut ibuffer = vec![0; 3];
        let mut ext = mat.sparse_column();
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[0, 1]);
        assert_eq!(range.index.unwrap(), &[0, 2]);
    }
}
