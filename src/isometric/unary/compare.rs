//! Comparisons against a scalar or vector, yielding 1 for true and 0 for false.

use super::UnaryOperation;
use crate::base::{Element, Selection};
use crate::isometric::ops::from_bool;
use crate::isometric::{CompareOp, Operand, SpecialCompareOp};
use num_traits::{Float, One, Zero};

/// `x op s` for each element `x`.
#[derive(Debug, Clone)]
pub struct CompareHelper<T> {
    op: CompareOp,
    operand: Operand<T>,
    sparse: bool,
}

impl<T: Element + Zero + One> CompareHelper<T> {
    pub fn new(op: CompareOp, operand: Operand<T>) -> Self {
        let sparse = operand.all(|s| !op.apply(T::zero(), s));
        Self { op, operand, sparse }
    }

    pub fn scalar(op: CompareOp, scalar: T) -> Self {
        Self::new(op, Operand::Scalar(scalar))
    }

    pub fn vector(op: CompareOp, values: Vec<T>, by_row: bool) -> Self {
        Self::new(op, Operand::vector(values, by_row))
    }

    #[inline]
    fn compute(&self, x: T, s: T) -> T {
        from_bool(self.op.apply(x, s))
    }
}

impl<T: Element + Zero + One> UnaryOperation<T> for CompareHelper<T> {
    fn dense(&self, row: bool, i: usize, selection: &Selection, values: &mut [T]) {
        self.operand
            .apply_dense(row, i, selection, values, |x, s| self.compute(x, s));
    }

    fn sparse(&self, row: bool, i: usize, values: &mut [T], indices: &[usize]) {
        self.operand
            .apply_sparse(row, i, values, indices, |x, s| self.compute(x, s));
    }

    fn fill(&self, row: bool, i: usize) -> T {
        self.operand
            .along(row, i)
            .map_or(T::zero(), |s| self.compute(T::zero(), s))
    }

    fn is_sparse(&self) -> bool {
        self.sparse
    }

    fn zero_depends_on_row(&self) -> bool {
        self.operand.depends_on_row()
    }

    fn zero_depends_on_column(&self) -> bool {
        self.operand.depends_on_column()
    }

    fn non_zero_depends_on_row(&self) -> bool {
        self.operand.depends_on_row()
    }

    fn non_zero_depends_on_column(&self) -> bool {
        self.operand.depends_on_column()
    }

    fn nrow(&self) -> Option<usize> {
        self.operand.nrow()
    }

    fn ncol(&self) -> Option<usize> {
        self.operand.ncol()
    }
}

/// 1 where the NaN/infinity test on `x` equals `pass`, 0 elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SpecialCompareHelper {
    op: SpecialCompareOp,
    pass: bool,
}

impl SpecialCompareHelper {
    pub fn new(op: SpecialCompareOp, pass: bool) -> Self {
        Self { op, pass }
    }

    #[inline]
    fn compute<T: Float>(&self, x: T) -> T {
        from_bool(self.op.apply(x) == self.pass)
    }
}

impl<T: Element + Float> UnaryOperation<T> for SpecialCompareHelper {
    fn dense(&self, _row: bool, _i: usize, _selection: &Selection, values: &mut [T]) {
        for v in values.iter_mut() {
            *v = self.compute(*v);
        }
    }

    fn sparse(&self, _row: bool, _i: usize, values: &mut [T], _indices: &[usize]) {
        for v in values.iter_mut() {
            *v = self.compute(*v);
        }
    }

    fn fill(&self, _row: bool, _i: usize) -> T {
        self.compute(T::zero())
    }

    fn is_sparse(&self) -> bool {
        self.op.apply(T::zero()) != self.pass
    }
}
