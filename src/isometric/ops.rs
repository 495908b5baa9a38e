//! Element-wise operations shared by the unary and binary wrappers.

use num_traits::{Float, One, Zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// Remainder with the sign of the dividend, as `fmod`.
    Modulo,
    /// `floor(x / y)`.
    IntegerDivide,
}

impl ArithmeticOp {
    #[inline]
    pub fn apply<T: Float>(self, x: T, y: T) -> T {
        match self {
            ArithmeticOp::Add => x + y,
            ArithmeticOp::Subtract => x - y,
            ArithmeticOp::Multiply => x * y,
            ArithmeticOp::Divide => x / y,
            ArithmeticOp::Power => x.powf(y),
            ArithmeticOp::Modulo => x % y,
            ArithmeticOp::IntegerDivide => (x / y).floor(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    NotEqual,
}

impl CompareOp {
    #[inline]
    pub fn apply<T: PartialOrd>(self, x: T, y: T) -> bool {
        match self {
            CompareOp::Equal => x == y,
            CompareOp::GreaterThan => x > y,
            CompareOp::LessThan => x < y,
            CompareOp::GreaterThanOrEqual => x >= y,
            CompareOp::LessThanOrEqual => x <= y,
            CompareOp::NotEqual => x != y,
        }
    }
}

/// Tests on a single floating-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCompareOp {
    IsNan,
    IsInf,
    IsFinite,
}

impl SpecialCompareOp {
    #[inline]
    pub fn apply<T: Float>(self, x: T) -> bool {
        match self {
            SpecialCompareOp::IsNan => x.is_nan(),
            SpecialCompareOp::IsInf => x.is_infinite(),
            SpecialCompareOp::IsFinite => x.is_finite(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Xor,
    Equal,
}

impl BooleanOp {
    #[inline]
    pub fn apply(self, x: bool, y: bool) -> bool {
        match self {
            BooleanOp::And => x && y,
            BooleanOp::Or => x || y,
            BooleanOp::Xor => x != y,
            BooleanOp::Equal => x == y,
        }
    }
}

/// Truthiness of a numeric value: anything other than zero is true.
#[inline]
pub fn truthy<T: Zero>(x: T) -> bool {
    !x.is_zero()
}

/// 1 for true, 0 for false.
#[inline]
pub fn from_bool<T: Zero + One>(x: bool) -> T {
    if x {
        T::one()
    } else {
        T::zero()
    }
}
