//! Delayed subsetting to a contiguous block of rows or columns.

use crate::base::{
    DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix, SparseExtractor,
    SparseRange,
};
use crate::error::{MatrixError, Result};
use std::sync::Arc;

/// Rows (`by_row = true`) or columns `[start, start + length)` of the inner matrix.
pub struct DelayedSubsetBlock<T: Element> {
    inner: SharedMatrix<T>,
    start: usize,
    length: usize,
    by_row: bool,
}

impl<T: Element> DelayedSubsetBlock<T> {
    pub fn new(inner: SharedMatrix<T>, start: usize, length: usize, by_row: bool) -> Result<Self> {
        let extent = inner.target_dim(by_row);
        if start.checked_add(length).map_or(true, |end| end > extent) {
            return Err(MatrixError::InvalidSelection(format!(
                "block [{}, {}+{}) exceeds extent {}",
                start, start, length, extent
            )));
        }
        Ok(Self {
            inner,
            start,
            length,
            by_row,
        })
    }

    /// Express a selection over the block in the inner matrix's coordinates.
    fn shift_selection(&self, selection: Selection) -> Selection {
        match selection {
            Selection::Full => Selection::block(self.start, self.length),
            Selection::Block { start, length } => Selection::block(self.start + start, length),
            Selection::Index(indices) => {
                Selection::index(indices.iter().map(|&i| i + self.start).collect())
            }
        }
    }
}

struct AlongDense<'a, T> {
    inner: Box<dyn DenseExtractor<T> + 'a>,
    shift: usize,
}

impl<T: Element> DenseExtractor<T> for AlongDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        self.inner.fetch(i + self.shift, buffer)
    }
}

struct AlongSparse<'a, T> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    shift: usize,
}

impl<T: Element> SparseExtractor<T> for AlongSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        self.inner.fetch(i + self.shift, vbuffer, ibuffer)
    }
}

/// Sparse extraction across the block; indices are shifted back to block coordinates.
struct AcrossSparse<'a, T> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    shift: usize,
    iholding: Vec<usize>,
}

impl<T: Element> SparseExtractor<T> for AcrossSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let range = self.inner.fetch(i, vbuffer, &mut self.iholding);
        let index = match range.index {
            Some(src) => {
                let out = &mut ibuffer[..src.len()];
                for (o, &x) in out.iter_mut().zip(src) {
                    *o = x - self.shift;
                }
                Some(&*out)
            }
            None => None,
        };
        SparseRange::new(range.number, range.value, index)
    }
}

impl<T: Element> Matrix<T> for DelayedSubsetBlock<T> {
    fn nrow(&self) -> usize {
        if self.by_row {
            self.length
        } else {
            self.inner.nrow()
        }
    }

    fn ncol(&self) -> usize {
        if self.by_row {
            self.inner.ncol()
        } else {
            self.length
        }
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

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        if row == self.by_row {
            Box::new(AlongDense {
                inner: self.inner.dense(row, selection, options),
                shift: self.start,
            })
        } else {
            self.inner.dense(row, self.shift_selection(selection), options)
        }
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if row == self.by_row {
            return Box::new(AlongSparse {
                inner: self.inner.sparse(row, selection, options),
                shift: self.start,
            });
        }
        let extent = selection.extent(self.length);
        Box::new(AcrossSparse {
            inner: self.inner.sparse(row, self.shift_selection(selection), options),
            shift: self.start,
            iholding: vec![0; if options.sparse_extract_index { extent } else { 0 }],
        })
    }
}

/// Shared-handle constructor for [`DelayedSubsetBlock`].
pub fn make_delayed_subset_block<T: Element>(
    inner: SharedMatrix<T>,
    start: usize,
    length: usize,
    by_row: bool,
) -> Result<SharedMatrix<T>> {
    Ok(Arc::new(DelayedSubsetBlock::new(inner, start, length, by_row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CompressedSparseMatrix;

    // 3 x 4:
    // 1 0 2 0
    // 0 3 0 4
    // 5 0 0 6
    fn example() -> SharedMatrix<i32> {
        Arc::new(
            CompressedSparseMatrix::csr(
                3,
                4,
                vec![1, 2, 3, 4, 5, 6],
                vec![0, 2, 1, 3, 0, 3],
                vec![0, 2, 4, 6],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_bounds() {
        assert!(DelayedSubsetBlock::new(example(), 2, 3, false).is_err());
        assert!(DelayedSubsetBlock::new(example(), 1, 3, false).is_ok());
    }

    #[test]
    fn test_column_block() {
        let sub = DelayedSubsetBlock::new(example(), 1, 3, false).unwrap();
        assert_eq!(sub.nrow(), 3);
        assert_eq!(sub.ncol(), 3);

        let mut buffer = vec![0; 3];
        let mut ext = sub.dense_row();
        assert_eq!(ext.fetch(1, &mut buffer), &[3, 0, 4]);
        let mut ext = sub.dense_column();
        assert_eq!(ext.fetch(2, &mut buffer), &[0, 4, 6]);

        let mut vbuffer = vec![0; 3];
        let mut ibuffer = vec![0; 3];
        let mut ext = sub.sparse(true, Selection::block(1, 2), &Options::default());
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[2]);
        assert_eq!(range.index.unwrap(), &[1]);

        let mut ext = sub.sparse_row();
        let range = ext.fetch(2, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[6]);
        assert_eq!(range.index.unwrap(), &[2]);
    }
}
