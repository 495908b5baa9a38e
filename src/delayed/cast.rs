//! Delayed conversion of the element type.

use crate::base::{
    DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix, SparseExtractor,
    SparseRange,
};
use num_traits::AsPrimitive;
use std::marker::PhantomData;

/// Presents a matrix of `I` as a matrix of `O`, converting each element
/// with `as` semantics as it is extracted.
pub struct DelayedCast<I: Element, O> {
    inner: SharedMatrix<I>,
    _output: PhantomData<fn() -> O>,
}

impl<I: Element, O> DelayedCast<I, O> {
    pub fn new(inner: SharedMatrix<I>) -> Self {
        Self {
            inner,
            _output: PhantomData,
        }
    }
}

struct CastDense<'a, I, O> {
    inner: Box<dyn DenseExtractor<I> + 'a>,
    holding: Vec<I>,
    _output: PhantomData<fn() -> O>,
}

impl<I, O> DenseExtractor<O> for CastDense<'_, I, O>
where
    I: Element + AsPrimitive<O>,
    O: Element,
{
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [O]) -> &'b [O] {
        let src = self.inner.fetch(i, &mut self.holding);
        let out = &mut buffer[..src.len()];
        for (o, &x) in out.iter_mut().zip(src) {
            *o = x.as_();
        }
        out
    }
}

struct CastSparse<'a, I, O> {
    inner: Box<dyn SparseExtractor<I> + 'a>,
    holding: Vec<I>,
    _output: PhantomData<fn() -> O>,
}

impl<I, O> SparseExtractor<O> for CastSparse<'_, I, O>
where
    I: Element + AsPrimitive<O>,
    O: Element,
{
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [O],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, O> {
        let range = self.inner.fetch(i, &mut self.holding, ibuffer);
        let value = match range.value {
            Some(src) => {
                let out = &mut vbuffer[..src.len()];
                for (o, &x) in out.iter_mut().zip(src) {
                    *o = x.as_();
                }
                Some(&*out)
            }
            None => None,
        };
        SparseRange::new(range.number, value, range.index)
    }
}

impl<I, O> Matrix<O> for DelayedCast<I, O>
where
    I: Element + AsPrimitive<O>,
    O: Element,
{
    fn nrow(&self) -> usize {
        self.inner.nrow()
    }

    fn ncol(&self) -> usize {
        self.inner.ncol()
    }

    fn is_sparse(&self) -> bool {
        self.inner.is_sparse()
    }

    fn is_sparse_proportion(&self) -> f64 {
        self.inner.is_sparse_proportion()
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

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<O> + '_> {
        let extent = selection.extent(self.inner.non_target_dim(row));
        Box::new(CastDense {
            inner: self.inner.dense(row, selection, options),
            holding: vec![I::default(); extent],
            _output: PhantomData,
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<O> + '_> {
        let extent = if options.sparse_extract_value {
            selection.extent(self.inner.non_target_dim(row))
        } else {
            0
        };
        Box::new(CastSparse {
            inner: self.inner.sparse(row, selection, options),
            holding: vec![I::default(); extent],
            _output: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::CompressedSparseMatrix;
    use std::sync::Arc;

    #[test]
    fn test_float_to_int() {
        let mat = DenseMatrix::row_major(2, 3, vec![1.7, -2.2, 3.0, 0.0, 5.9, -0.5]).unwrap();
        let cast: DelayedCast<f64, i32> = DelayedCast::new(Arc::new(mat));
        assert_eq!(cast.nrow(), 2);
        assert!(!cast.is_sparse());

        let mut buffer = vec![0; 3];
        let mut ext = cast.dense_row();
        assert_eq!(ext.fetch(0, &mut buffer), &[1, -2, 3]);
        let mut ext = cast.dense_column();
        assert_eq!(ext.fetch(1, &mut buffer), &[-2, 5]);
    }

    #[test]
    fn test_sparse_int_to_float() {
        let mat = CompressedSparseMatrix::csr(2, 4, vec![3, 4], vec![1, 3], vec![0, 1, 2]).unwrap();
        let cast: DelayedCast<i32, f32> = DelayedCast::new(Arc::new(mat));
        assert!(cast.is_sparse());

        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];
        let mut ext = cast.sparse_row();
        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[4.0]);
        assert_eq!(range.index.unwrap(), &[3]);

        let opts = Options {
            sparse_extract_value: false,
            ..Options::default()
        };
        let mut ext = cast.sparse(true, Selection::Full, &opts);
        let mut nothing: Vec<f32> = Vec::new();
        let range = ext.fetch(0, &mut nothing, &mut ibuffer);
        assert!(range.value.is_none());
        assert_eq!(range.index.unwrap(), &[1]);
    }
}
