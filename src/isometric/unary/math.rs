//! Standard mathematical functions applied element-wise.

use super::UnaryOperation;
use crate::base::{is_zero, Element, Selection};
use num_traits::Float;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathFunction<T> {
    Abs,
    /// -1, 0 or 1; NaN stays NaN.
    Sign,
    /// Natural logarithm, or the logarithm in the given base.
    Log(Option<T>),
    Log1p,
    Sqrt,
    Ceiling,
    Floor,
    Trunc,
    /// Half-way cases round away from zero.
    Round,
    Exp,
    Expm1,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
}

impl<T: Float> MathFunction<T> {
    #[inline]
    pub fn apply(&self, x: T) -> T {
        match self {
            MathFunction::Abs => x.abs(),
            MathFunction::Sign => {
                if x.is_nan() || x == T::zero() {
                    x
                } else {
                    x.signum()
                }
            }
            MathFunction::Log(None) => x.ln(),
            MathFunction::Log(Some(base)) => x.ln() / base.ln(),
            MathFunction::Log1p => x.ln_1p(),
            MathFunction::Sqrt => x.sqrt(),
            MathFunction::Ceiling => x.ceil(),
            MathFunction::Floor => x.floor(),
            MathFunction::Trunc => x.trunc(),
            MathFunction::Round => x.round(),
            MathFunction::Exp => x.exp(),
            MathFunction::Expm1 => x.exp_m1(),
            MathFunction::Sin => x.sin(),
            MathFunction::Cos => x.cos(),
            MathFunction::Tan => x.tan(),
            MathFunction::Asin => x.asin(),
            MathFunction::Acos => x.acos(),
            MathFunction::Atan => x.atan(),
            MathFunction::Sinh => x.sinh(),
            MathFunction::Cosh => x.cosh(),
            MathFunction::Tanh => x.tanh(),
            MathFunction::Asinh => x.asinh(),
            MathFunction::Acosh => x.acosh(),
            MathFunction::Atanh => x.atanh(),
        }
    }
}

/// Wraps a [`MathFunction`] as a [`UnaryOperation`].
#[derive(Debug, Clone, Copy)]
pub struct MathHelper<T> {
    function: MathFunction<T>,
    sparse: bool,
}

impl<T: Element + Float> MathHelper<T> {
    pub fn new(function: MathFunction<T>) -> Self {
        let sparse = is_zero(function.apply(T::zero()));
        Self { function, sparse }
    }

    pub fn function(&self) -> MathFunction<T> {
        self.function
    }
}

impl<T: Element + Float> UnaryOperation<T> for MathHelper<T> {
    fn dense(&self, _row: bool, _i: usize, _selection: &Selection, values: &mut [T]) {
        for v in values.iter_mut() {
            *v = self.function.apply(*v);
        }
    }

    fn sparse(&self, _row: bool, _i: usize, values: &mut [T], _indices: &[usize]) {
        for v in values.iter_mut() {
            *v = self.function.apply(*v);
        }
    }

    fn fill(&self, _row: bool, _i: usize) -> T {
        self.function.apply(T::zero())
    }

    fn is_sparse(&self) -> bool {
        self.sparse
    }
}
