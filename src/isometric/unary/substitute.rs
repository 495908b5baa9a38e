//! Replace elements that satisfy a comparison.

use super::UnaryOperation;
use crate::base::{is_zero, Element, Selection};
use crate::error::{MatrixError, Result};
use crate::isometric::{CompareOp, Operand, SpecialCompareOp};
use num_traits::{Float, Zero};

/// Replace `x` with the substitute wherever `x op compared` holds.
/// The operand holds `(compared, substitute)` pairs.
#[derive(Debug, Clone)]
pub struct SubstituteHelper<T> {
    op: CompareOp,
    operand: Operand<(T, T)>,
    sparse: bool,
}

impl<T: Element + Zero> SubstituteHelper<T> {
    pub fn new(op: CompareOp, operand: Operand<(T, T)>) -> Self {
        let sparse = operand.all(|(compared, substitute)| !op.apply(T::zero(), compared) || is_zero(substitute));
        Self { op, operand, sparse }
    }

    pub fn scalar(op: CompareOp, compared: T, substitute: T) -> Self {
        Self::new(op, Operand::Scalar((compared, substitute)))
    }

    /// Per-row (`by_row`) or per-column comparison and substitute values,
    /// which must have the same length.
    pub fn vector(op: CompareOp, compared: Vec<T>, substitute: Vec<T>, by_row: bool) -> Result<Self> {
        if compared.len() != substitute.len() {
            return Err(MatrixError::DimensionMismatch(format!(
                "comparison vector has length {} but substitute vector has length {}",
                compared.len(),
                substitute.len()
            )));
        }
        let pairs = compared.into_iter().zip(substitute).collect();
        Ok(Self::new(op, Operand::vector(pairs, by_row)))
    }

    #[inline]
    fn compute(&self, x: T, (compared, substitute): (T, T)) -> T {
        if self.op.apply(x, compared) {
            substitute
        } else {
            x
        }
    }
}

impl<T: Element + Zero> UnaryOperation<T> for SubstituteHelper<T> {
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

/// Replace `x` with `substitute` wherever the NaN/infinity test on `x` equals `pass`.
#[derive(Debug, Clone, Copy)]
pub struct SpecialSubstituteHelper<T> {
    op: SpecialCompareOp,
    pass: bool,
    substitute: T,
}

impl<T: Element + Float> SpecialSubstituteHelper<T> {
    pub fn new(op: SpecialCompareOp, pass: bool, substitute: T) -> Self {
        Self { op, pass, substitute }
    }

    #[inline]
    fn compute(&self, x: T) -> T {
        if self.op.apply(x) == self.pass {
            self.substitute
        } else {
            x
        }
    }
}

impl<T: Element + Float> UnaryOperation<T> for SpecialSubstituteHelper<T> {
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
        is_zero(self.compute(T::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_substitute() {
        let op = SubstituteHelper::scalar(CompareOp::GreaterThan, 2.0, 2.0);
        assert!(op.is_sparse());
        let mut values = vec![1.0, 5.0, -3.0];
        op.dense(true, 0, &Selection::Full, &mut values);
        assert_eq!(values, vec![1.0, 2.0, -3.0]);

        let op = SubstituteHelper::scalar(CompareOp::Equal, 0.0, 9.0);
        assert!(!op.is_sparse());
        assert_eq!(op.fill(true, 0), 9.0);
    }

    #[test]
    fn test_vector_substitute() {
        let op = SubstituteHelper::vector(CompareOp::LessThan, vec![0.0, 1.0], vec![-1.0, 0.0], true).unwrap();
        assert!(op.is_sparse());
        assert!(op.zero_depends_on_row());
        let mut values = vec![0.5, -2.0];
        op.sparse(true, 1, &mut values, &[]);
        assert_eq!(values, vec![0.0, 0.0]);
        let mut values = vec![0.5, -2.0];
        op.sparse(true, 0, &mut values, &[]);
        assert_eq!(values, vec![0.5, -1.0]);
    }

    #[test]
    fn test_vector_length_mismatch() {
        let err = SubstituteHelper::vector(CompareOp::Equal, vec![1.0, 2.0, 3.0], vec![0.0], false).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch(_)));
    }

    #[test]
    fn test_integer_substitute() {
        // Cap counts at 100.
        let op = SubstituteHelper::scalar(CompareOp::GreaterThan, 100_u32, 100);
        assert!(op.is_sparse());
        let mut values = vec![3, 250, 100];
        op.dense(true, 0, &Selection::Full, &mut values);
        assert_eq!(values, vec![3, 100, 100]);
    }

    #[test]
    fn test_special_substitute() {
        let op = SpecialSubstituteHelper::new(SpecialCompareOp::IsNan, true, 0.0);
        assert!(op.is_sparse());
        let mut values = vec![f64::NAN, 1.0];
        op.dense(false, 0, &Selection::Full, &mut values);
        assert_eq!(values, vec![0.0, 1.0]);

        let op = SpecialSubstituteHelper::new(SpecialCompareOp::IsFinite, true, 7.0);
        assert!(!op.is_sparse());
        let mut values = vec![f64::INFINITY, 1.0];
        op.dense(false, 0, &Selection::Full, &mut values);
        assert_eq!(values, vec![f64::INFINITY, 7.0]);
    }
}
