//! Logical operations. Non-zero inputs are true, outputs are 1 or 0.

use super::UnaryOperation;
use crate::base::{Element, Selection};
use crate::isometric::ops::{from_bool, truthy};
use crate::isometric::{BooleanOp, Operand};
use num_traits::{One, Zero};

/// `truthy(x) op s` for a boolean scalar or vector `s`.
#[derive(Debug, Clone)]
pub struct BooleanHelper {
    op: BooleanOp,
    operand: Operand<bool>,
    sparse: bool,
}

impl BooleanHelper {
    pub fn new(op: BooleanOp, operand: Operand<bool>) -> Self {
        let sparse = operand.all(|s| !op.apply(false, s));
        Self { op, operand, sparse }
    }

    pub fn scalar(op: BooleanOp, scalar: bool) -> Self {
        Self::new(op, Operand::Scalar(scalar))
    }

    pub fn vector(op: BooleanOp, values: Vec<bool>, by_row: bool) -> Self {
        Self::new(op, Operand::vector(values, by_row))
    }
}

impl<T: Element + Zero + One> UnaryOperation<T> for BooleanHelper {
    fn dense(&self, row: bool, i: usize, selection: &Selection, values: &mut [T]) {
        let op = self.op;
        self.operand
            .apply_dense(row, i, selection, values, |x: T, s| from_bool(op.apply(truthy(x), s)));
    }

    fn sparse(&self, row: bool, i: usize, values: &mut [T], indices: &[usize]) {
        let op = self.op;
        self.operand
            .apply_sparse(row, i, values, indices, |x: T, s| from_bool(op.apply(truthy(x), s)));
    }

    fn fill(&self, row: bool, i: usize) -> T {
        self.operand
            .along(row, i)
            .map_or(T::zero(), |s| from_bool(self.op.apply(false, s)))
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

/// Logical negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanNotHelper;

impl<T: Element + Zero + One> UnaryOperation<T> for BooleanNotHelper {
    fn dense(&self, _row: bool, _i: usize, _selection: &Selection, values: &mut [T]) {
        for v in values.iter_mut() {
            *v = from_bool(!truthy(*v));
        }
    }

    fn sparse(&self, _row: bool, _i: usize, values: &mut [T], _indices: &[usize]) {
        for v in values.iter_mut() {
            *v = from_bool(!truthy(*v));
        }
    }

    fn fill(&self, _row: bool, _i: usize) -> T {
        T::one()
    }

    fn is_sparse(&self) -> bool {
        false
    }
}
