//! Matrix where every element has the same value.

use crate::base::{
    is_zero, DenseExtractor, Element, Matrix, Options, Selection, SparseExtractor, SparseRange,
};
use crate::dense::SparsifiedWrapper;

/// Matrix of `nrow` by `ncol` copies of one value, without any storage.
#[derive(Debug, Clone)]
pub struct ConstantMatrix<T> {
    nrow: usize,
    ncol: usize,
    value: T,
}

impl<T: Element> ConstantMatrix<T> {
    pub fn new(nrow: usize, ncol: usize, value: T) -> Self {
        Self { nrow, ncol, value }
    }

    /// All-zero matrix.
    pub fn zeros(nrow: usize, ncol: usize) -> Self {
        Self::new(nrow, ncol, T::default())
    }

    pub fn value(&self) -> T {
        self.value
    }
}

struct ConstantDense<T> {
    value: T,
    extent: usize,
}

impl<T: Element> DenseExtractor<T> for ConstantDense<T> {
    fn fetch<'b>(&'b mut self, _i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let out = &mut buffer[..self.extent];
        out.fill(self.value);
        out
    }
}

struct EmptySparse;

impl<T: Element> SparseExtractor<T> for EmptySparse {
    fn fetch<'b>(
        &'b mut self,
        _i: usize,
        _vbuffer: &'b mut [T],
        _ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        SparseRange::empty()
    }
}

impl<T: Element> Matrix<T> for ConstantMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        is_zero(self.value)
    }

    fn prefer_rows(&self) -> bool {
        true
    }

    fn dense(&self, row: bool, selection: Selection, _options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        Box::new(ConstantDense {
            value: self.value,
            extent: selection.extent(self.non_target_dim(row)),
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if is_zero(self.value) {
            return Box::new(EmptySparse);
        }
        let full = self.non_target_dim(row);
        let inner = self.dense(row, selection.clone(), options);
        Box::new(SparsifiedWrapper::new(inner, &selection, full, options))
    }
}
