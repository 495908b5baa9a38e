//! Arithmetic between matrix elements and a scalar or vector.

use super::UnaryOperation;
use crate::base::{is_zero, Element, Selection};
use crate::isometric::{ArithmeticOp, Operand};
use num_traits::Float;

/// `x op s` when `right` is set (the operand is on the right), `s op x` otherwise.
/// Addition and multiplication ignore `right`.
#[derive(Debug, Clone)]
pub struct ArithmeticHelper<T> {
    op: ArithmeticOp,
    right: bool,
    operand: Operand<T>,
    sparse: bool,
}

impl<T: Element + Float> ArithmeticHelper<T> {
    pub fn new(op: ArithmeticOp, right: bool, operand: Operand<T>) -> Self {
        let mut output = Self {
            op,
            right,
            operand,
            sparse: false,
        };
        output.sparse = output.operand.all(|s| is_zero(output.compute(T::zero(), s)));
        output
    }

    pub fn scalar(op: ArithmeticOp, right: bool, scalar: T) -> Self {
        Self::new(op, right, Operand::Scalar(scalar))
    }

    /// One value per row (`by_row = true`) or per column.
    pub fn vector(op: ArithmeticOp, right: bool, values: Vec<T>, by_row: bool) -> Self {
        Self::new(op, right, Operand::vector(values, by_row))
    }

    #[inline]
    fn compute(&self, x: T, s: T) -> T {
        if self.right {
            self.op.apply(x, s)
        } else {
            self.op.apply(s, x)
        }
    }
}

impl<T: Element + Float> UnaryOperation<T> for ArithmeticHelper<T> {
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
