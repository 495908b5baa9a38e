//! Delayed isometric operations: the output has the same shape as the input
//!
//! - Ops: the arithmetic, comparison and boolean operators shared by both families
//! - Operand: scalar or per-row/per-column second argument
//! - Unary: one matrix combined with an operand or a math function
//! - Binary: two matrices of the same shape combined element-wise

pub mod binary;
pub mod operand;
pub mod ops;
pub mod unary;

pub use binary::{
    make_delayed_binary, BinaryArithmeticHelper, BinaryBooleanHelper, BinaryCompareHelper,
    BinaryOperation, DelayedBinaryIsometric,
};
pub use operand::Operand;
pub use ops::{ArithmeticOp, BooleanOp, CompareOp, SpecialCompareOp};
pub use unary::{
    make_delayed_unary, ArithmeticHelper, BooleanHelper, BooleanNotHelper, CompareHelper,
    DelayedUnaryIsometric, MathFunction, MathHelper, SpecialCompareHelper,
    SpecialSubstituteHelper, SubstituteHelper, UnaryOperation,
};
