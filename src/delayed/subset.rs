//! Delayed subsetting by an arbitrary vector of row/column indices.
//!
//! Indices may be unsorted and may contain duplicates. Extraction across
//! the subset only ever asks the inner matrix for the sorted unique set of
//! needed rows/columns, then expands the result to the requested layout.

use super::subset_block::DelayedSubsetBlock;
use crate::base::{
    take_prefix, DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix,
    SparseExtractor, SparseRange,
};
use crate::error::{MatrixError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Rows (`by_row = true`) or columns of the inner matrix picked by `indices`.
pub struct DelayedSubset<T: Element> {
    inner: SharedMatrix<T>,
    indices: Arc<Vec<usize>>,
    by_row: bool,
    /// Whether `indices` is non-decreasing.
    sorted: bool,
}

impl<T: Element> DelayedSubset<T> {
    pub fn new(inner: SharedMatrix<T>, indices: Vec<usize>, by_row: bool) -> Result<Self> {
        let extent = inner.target_dim(by_row);
        if let Some(&bad) = indices.iter().find(|&&i| i >= extent) {
            return Err(MatrixError::IndexOutOfRange { index: bad, extent });
        }
        let sorted = indices.windows(2).all(|w| w[0] <= w[1]);
        Ok(Self {
            inner,
            indices: Arc::new(indices),
            by_row,
            sorted,
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Mapping from the selected output positions to the unique inner indices.
struct Expansion {
    /// Sorted unique inner indices to request.
    unique: Vec<usize>,
    /// For each selected output position (in selection order), its slot in `unique`.
    slots: Vec<usize>,
    /// Output positions for each slot, sorted: `positions[offsets[u]..offsets[u + 1]]`.
    positions: Vec<usize>,
    offsets: Vec<usize>,
}

impl Expansion {
    fn new(indices: &[usize], selection: &Selection) -> Self {
        let mut pairs: Vec<(usize, usize, usize)> = selection
            .iter(indices.len())
            .enumerate()
            .map(|(k, p)| (indices[p], p, k))
            .collect();
        pairs.sort_unstable();

        let mut unique = Vec::new();
        let mut slots = vec![0; pairs.len()];
        let mut positions = Vec::with_capacity(pairs.len());
        let mut offsets = vec![0];
        for &(inner, p, k) in &pairs {
            if unique.last() != Some(&inner) {
                if !unique.is_empty() {
                    offsets.push(positions.len());
                }
                unique.push(inner);
            }
            slots[k] = unique.len() - 1;
            positions.push(p);
        }
        if !unique.is_empty() {
            offsets.push(positions.len());
        }

        Self {
            unique,
            slots,
            positions,
            offsets,
        }
    }
}

struct AlongDense<'a, T> {
    inner: Box<dyn DenseExtractor<T> + 'a>,
    indices: &'a [usize],
}

impl<T: Element> DenseExtractor<T> for AlongDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        self.inner.fetch(self.indices[i], buffer)
    }
}

struct AlongSparse<'a, T> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    indices: &'a [usize],
}

impl<T: Element> SparseExtractor<T> for AlongSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        self.inner.fetch(self.indices[i], vbuffer, ibuffer)
    }
}

struct AcrossDense<'a, T> {
    inner: Box<dyn DenseExtractor<T> + 'a>,
    slots: Vec<usize>,
    holding: Vec<T>,
}

impl<T: Element> DenseExtractor<T> for AcrossDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let src = self.inner.fetch(i, &mut self.holding);
        let out = &mut buffer[..self.slots.len()];
        for (o, &s) in out.iter_mut().zip(&self.slots) {
            *o = src[s];
        }
        out
    }
}

struct AcrossSparse<'a, T> {
    inner: Box<dyn SparseExtractor<T> + 'a>,
    /// Inner index to slot in the expansion.
    lookup: FxHashMap<usize, usize>,
    positions: Vec<usize>,
    offsets: Vec<usize>,
    vholding: Vec<T>,
    iholding: Vec<usize>,
    sortspace: Vec<(usize, T)>,
    needs_sort: bool,
    extract_value: bool,
    extract_index: bool,
}

impl<T: Element> SparseExtractor<T> for AcrossSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let range = self.inner.fetch(i, &mut self.vholding, &mut self.iholding);
        let Some(inner_indices) = range.index else {
            return SparseRange::empty();
        };

        let mut count = 0;
        if self.needs_sort {
            self.sortspace.clear();
            for (j, &idx) in inner_indices.iter().enumerate() {
                let u = self.lookup[&idx];
                let value = range.value.map_or(T::default(), |v| v[j]);
                for &p in &self.positions[self.offsets[u]..self.offsets[u + 1]] {
                    self.sortspace.push((p, value));
                }
            }
            self.sortspace.sort_unstable_by_key(|x| x.0);
            for &(p, value) in &self.sortspace {
                if self.extract_value {
                    vbuffer[count] = value;
                }
                if self.extract_index {
                    ibuffer[count] = p;
                }
                count += 1;
            }
        } else {
            for (j, &idx) in inner_indices.iter().enumerate() {
                let u = self.lookup[&idx];
                for &p in &self.positions[self.offsets[u]..self.offsets[u + 1]] {
                    if let Some(values) = range.value {
                        vbuffer[count] = values[j];
                    }
                    if self.extract_index {
                        ibuffer[count] = p;
                    }
                    count += 1;
                }
            }
        }

        SparseRange::new(
            count,
            take_prefix(self.extract_value, vbuffer, count),
            take_prefix(self.extract_index, ibuffer, count),
        )
    }
}

impl<T: Element> Matrix<T> for DelayedSubset<T> {
    fn nrow(&self) -> usize {
        if self.by_row {
            self.indices.len()
        } else {
            self.inner.nrow()
        }
    }

    fn ncol(&self) -> usize {
        if self.by_row {
            self.inner.ncol()
        } else {
            self.indices.len()
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
            return Box::new(AlongDense {
                inner: self.inner.dense(row, selection, options),
                indices: &self.indices,
            });
        }

        let expansion = Expansion::new(&self.indices, &selection);
        let holding = vec![T::default(); expansion.unique.len()];
        Box::new(AcrossDense {
            inner: self.inner.dense(row, Selection::index(expansion.unique), options),
            slots: expansion.slots,
            holding,
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if row == self.by_row {
            return Box::new(AlongSparse {
                inner: self.inner.sparse(row, selection, options),
                indices: &self.indices,
            });
        }

        let expansion = Expansion::new(&self.indices, &selection);
        let lookup: FxHashMap<usize, usize> = expansion
            .unique
            .iter()
            .enumerate()
            .map(|(u, &idx)| (idx, u))
            .collect();
        let needed = expansion.unique.len();
        debug!("Subset sparse extraction needs {} unique inner elements", needed);

        // Inner indices are always needed to expand duplicates.
        let inner_options = Options {
            sparse_extract_index: true,
            ..*options
        };
        Box::new(AcrossSparse {
            inner: self.inner.sparse(row, Selection::index(expansion.unique), &inner_options),
            lookup,
            positions: expansion.positions,
            offsets: expansion.offsets,
            vholding: vec![T::default(); if options.sparse_extract_value { needed } else { 0 }],
            iholding: vec![0; needed],
            sortspace: Vec::new(),
            needs_sort: options.sparse_ordered_index && !self.sorted,
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        })
    }
}

/// Build the cheapest subset wrapper for `indices`: a block subset when the
/// indices form a consecutive increasing run, a general subset otherwise.
pub fn make_delayed_subset<T: Element>(
    inner: SharedMatrix<T>,
    indices: Vec<usize>,
    by_row: bool,
) -> Result<SharedMatrix<T>> {
    let consecutive = indices.windows(2).all(|w| w[1] == w[0] + 1);
    if consecutive {
        let start = indices.first().copied().unwrap_or(0);
        return Ok(Arc::new(DelayedSubsetBlock::new(inner, start, indices.len(), by_row)?));
    }
    Ok(Arc::new(DelayedSubset::new(inner, indices, by_row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::CompressedSparseMatrix;

    // 4 x 3:
    // 1 0 2
    // 0 0 3
    // 4 5 0
    // 0 6 0
    fn sparse_example() -> SharedMatrix<f64> {
        Arc::new(
            CompressedSparseMatrix::csc(
                4,
                3,
                vec![1.0, 4.0, 5.0, 6.0, 2.0, 3.0],
                vec![0, 2, 2, 3, 0, 1],
                vec![0, 2, 4, 6],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_out_of_range() {
        assert!(DelayedSubset::new(sparse_example(), vec![0, 4], true).is_err());
        assert!(make_delayed_subset(sparse_example(), vec![1, 2, 3, 4], true).is_err());
    }

    #[test]
    fn test_expansion() {
        let exp = Expansion::new(&[3, 1, 3, 0], &Selection::Full);
        assert_eq!(exp.unique, vec![0, 1, 3]);
        assert_eq!(exp.slots, vec![2, 1, 2, 0]);
        assert_eq!(exp.positions, vec![3, 1, 0, 2]);
        assert_eq!(exp.offsets, vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_rows_with_duplicates() {
        let sub = DelayedSubset::new(sparse_example(), vec![2, 0, 2, 3], true).unwrap();
        assert_eq!(sub.nrow(), 4);
        assert_eq!(sub.ncol(), 3);

        let mut buffer = vec![0.0; 4];
        let mut ext = sub.dense_row();
        assert_eq!(ext.fetch(0, &mut buffer), &[4.0, 5.0, 0.0]);
        assert_eq!(ext.fetch(3, &mut buffer), &[0.0, 6.0, 0.0]);

        let mut ext = sub.dense_column();
        assert_eq!(ext.fetch(0, &mut buffer), &[4.0, 1.0, 4.0, 0.0]);
        assert_eq!(ext.fetch(1, &mut buffer), &[5.0, 0.0, 5.0, 6.0]);

        let mut ext = sub.dense(false, Selection::index(vec![1, 2]), &Options::default());
        assert_eq!(ext.fetch(2, &mut buffer), &[2.0, 0.0]);
    }

    #[test]
    fn test_sparse_across_is_ordered() {
        let sub = DelayedSubset::new(sparse_example(), vec![2, 0, 2, 3], true).unwrap();
        let mut vbuffer = vec![0.0; 4];
        let mut ibuffer = vec![0; 4];

        let mut ext = sub.sparse_column();
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.number, 3);
        assert_eq!(range.value.unwrap(), &[4.0, 1.0, 4.0]);
        assert_eq!(range.index.unwrap(), &[0, 1, 2]);

        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[5.0, 5.0, 6.0]);
        assert_eq!(range.index.unwrap(), &[0, 2, 3]);

        let opts = Options {
            sparse_extract_value: false,
            ..Options::default()
        };
        let mut ext = sub.sparse(false, Selection::block(1, 3), &opts);
        let mut nothing: Vec<f64> = Vec::new();
        let range = ext.fetch(2, &mut nothing, &mut ibuffer);
        assert!(range.value.is_none());
        assert_eq!(range.index.unwrap(), &[1]);
    }

    #[test]
    fn test_dense_inner_columns() {
        let inner: SharedMatrix<i32> =
            Arc::new(DenseMatrix::row_major(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap());
        let sub = DelayedSubset::new(inner, vec![3, 3, 0], false).unwrap();
        let mut buffer = vec![0; 3];
        let mut ext = sub.dense_row();
        assert_eq!(ext.fetch(1, &mut buffer), &[8, 8, 5]);

        let mut vbuffer = vec![0; 3];
        let mut ibuffer = vec![0; 3];
        let mut ext = sub.sparse_row();
        let range = ext.fetch(0, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[4, 4, 1]);
        assert_eq!(range.index.unwrap(), &[0, 1, 2]);
    }

    #[test]
    fn test_make_delayed_subset_picks_block() {
        let sub = make_delayed_subset(sparse_example(), vec![1, 2, 3], true).unwrap();
        assert_eq!(sub.nrow(), 3);
        let mut buffer = vec![0.0; 3];
        let mut ext = sub.dense_row();
        assert_eq!(ext.fetch(0, &mut buffer), &[0.0, 0.0, 3.0]);

        let sub = make_delayed_subset(sparse_example(), vec![3, 0], true).unwrap();
        let mut ext = sub.dense_row();
        assert_eq!(ext.fetch(0, &mut buffer), &[0.0, 6.0, 0.0]);
    }
}
