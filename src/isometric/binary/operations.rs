use super::BinaryOperation;
use crate::base::Element;
use crate::isometric::ops::{from_bool, truthy};
use crate::isometric::{ArithmeticOp, BooleanOp, CompareOp};
use num_traits::{Float, One, Zero};

/// `left op right`.
#[derive(Debug, Clone, Copy)]
pub struct BinaryArithmeticHelper {
    op: ArithmeticOp,
}

impl BinaryArithmeticHelper {
    pub fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }
}

impl<T: Element + Float> BinaryOperation<T> for BinaryArithmeticHelper {
    #[inline]
    fn apply(&self, left: T, right: T) -> T {
        self.op.apply(left, right)
    }
}

/// 1 where `left op right` holds, 0 elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct BinaryCompareHelper {
    op: CompareOp,
}

impl BinaryCompareHelper {
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }
}

impl<T: Element + Zero + One> BinaryOperation<T> for BinaryCompareHelper {
    #[inline]
    fn apply(&self, left: T, right: T) -> T {
        from_bool(self.op.apply(left, right))
    }
}

/// Logical combination with non-zero as true.
#[derive(Debug, Clone, Copy)]
pub struct BinaryBooleanHelper {
    op: BooleanOp,
}

impl BinaryBooleanHelper {
    pub fn new(op: BooleanOp) -> Self {
        Self { op }
    }
}

impl<T: Element + Zero + One> BinaryOperation<T> for BinaryBooleanHelper {
    #[inline]
    fn apply(&self, left: T, right: T) -> T {
        from_bool(self.op.apply(truthy(left), truthy(right)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparsity() {
        let sparse = |op: &dyn BinaryOperation<f64>| op.is_sparse();
        assert!(sparse(&BinaryArithmeticHelper::new(ArithmeticOp::Multiply)));
        assert!(sparse(&BinaryArithmeticHelper::new(ArithmeticOp::Subtract)));
        // 0 / 0 and 0^0 are not zero.
        assert!(!sparse(&BinaryArithmeticHelper::new(ArithmeticOp::Divide)));
        assert!(!sparse(&BinaryArithmeticHelper::new(ArithmeticOp::Power)));
        assert!(sparse(&BinaryCompareHelper::new(CompareOp::NotEqual)));
        assert!(!sparse(&BinaryCompareHelper::new(CompareOp::LessThanOrEqual)));
        assert!(sparse(&BinaryBooleanHelper::new(BooleanOp::Or)));
        assert!(!sparse(&BinaryBooleanHelper::new(BooleanOp::Equal)));
    }

    #[test]
    fn test_apply() {
        assert_eq!(BinaryArithmeticHelper::new(ArithmeticOp::IntegerDivide).apply(7.0_f64, -2.0), -4.0);
        assert_eq!(BinaryCompareHelper::new(CompareOp::GreaterThan).apply(3.0_f64, 1.0), 1.0);
        assert_eq!(BinaryBooleanHelper::new(BooleanOp::Xor).apply(0.5_f64, 0.0), 1.0);
        assert_eq!(BinaryBooleanHelper::new(BooleanOp::And).apply(0.5_f32, 0.0), 0.0);
        assert_eq!(BinaryCompareHelper::new(CompareOp::LessThan).apply(-2_i32, 1), 1);
        assert_eq!(BinaryBooleanHelper::new(BooleanOp::Or).apply(0_u8, 0), 0);
    }
}
