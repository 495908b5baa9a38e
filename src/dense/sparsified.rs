//! Sparse extraction on top of a dense extractor.
//!
//! Every selected element is reported as a structural non-zero, so the
//! indices are simply the selected positions.

use crate::base::{DenseExtractor, Element, Options, Selection, SparseExtractor, SparseRange};
use std::sync::Arc;

pub struct SparsifiedWrapper<'a, T> {
    inner: Box<dyn DenseExtractor<T> + 'a>,
    positions: Arc<Vec<usize>>,
    extract_value: bool,
    extract_index: bool,
}

impl<'a, T: Element> SparsifiedWrapper<'a, T> {
    /// `full` is the length of the non-target dimension.
    pub fn new(
        inner: Box<dyn DenseExtractor<T> + 'a>,
        selection: &Selection,
        full: usize,
        options: &Options,
    ) -> Self {
        let positions = match selection {
            Selection::Index(indices) => Arc::clone(indices),
            other => Arc::new(other.to_indices(full)),
        };
        Self {
            inner,
            positions,
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        }
    }
}

impl<T: Element> SparseExtractor<T> for SparsifiedWrapper<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        _ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let number = self.positions.len();
        let value = if self.extract_value {
            Some(self.inner.fetch(i, vbuffer))
        } else {
            None
        };
        let index = if self.extract_index {
            Some(&self.positions[..])
        } else {
            None
        };
        SparseRange::new(number, value, index)
    }
}
