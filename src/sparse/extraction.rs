//! Extraction machinery shared by the compressed and fragmented sparse backends.
//!
//! "Primary" extraction walks along the storage dimension (rows of a CSR
//! matrix) and can return slices of storage directly. "Secondary" extraction
//! walks across it, keeping one cursor per selected primary element so that
//! consecutive requests only move each cursor a short distance.

use crate::base::{
    take_prefix, DenseExtractor, Element, Options, Selection, SparseExtractor, SparseRange,
};

/// Per-primary-element view of the structure of sparse storage.
pub(crate) trait SparseIndices: Sync {
    fn primary_len(&self) -> usize;
    fn secondary_len(&self) -> usize;
    fn primary_indices(&self, p: usize) -> &[usize];
}

/// Per-primary-element view of sparse storage.
pub(crate) trait SparseStore<T>: SparseIndices {
    fn primary_values(&self, p: usize) -> &[T];
}

/// Position range of `indices` falling inside `[start, end)`.
fn bounds(indices: &[usize], start: usize, end: usize) -> (usize, usize) {
    let lo = indices.partition_point(|&x| x < start);
    let hi = lo + indices[lo..].partition_point(|&x| x < end);
    (lo, hi)
}

pub(crate) struct PrimarySparse<'a, S> {
    store: &'a S,
    selection: Selection,
    extract_value: bool,
    extract_index: bool,
}

impl<'a, S> PrimarySparse<'a, S> {
    pub(crate) fn new(store: &'a S, selection: Selection, options: &Options) -> Self {
        Self {
            store,
            selection,
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        }
    }
}

impl<T: Element, S: SparseStore<T>> SparseExtractor<T> for PrimarySparse<'_, S> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let store = self.store;
        let values = store.primary_values(i);
        let indices = store.primary_indices(i);

        let (vals, idx): (&[T], &[usize]) = match &self.selection {
            Selection::Full => (values, indices),
            Selection::Block { start, length } => {
                let (lo, hi) = bounds(indices, *start, start + length);
                (&values[lo..hi], &indices[lo..hi])
            }
            Selection::Index(wanted) => {
                let mut count = 0;
                let mut pos = 0;
                for &w in wanted.iter() {
                    pos += indices[pos..].partition_point(|&x| x < w);
                    if pos == indices.len() {
                        break;
                    }
                    if indices[pos] == w {
                        if self.extract_value {
                            vbuffer[count] = values[pos];
                        }
                        if self.extract_index {
                            ibuffer[count] = w;
                        }
                        count += 1;
                    }
                }
                return SparseRange::new(
                    count,
                    take_prefix(self.extract_value, vbuffer, count),
                    take_prefix(self.extract_index, ibuffer, count),
                );
            }
        };

        SparseRange::new(
            vals.len(),
            self.extract_value.then_some(vals),
            self.extract_index.then_some(idx),
        )
    }
}

pub(crate) struct PrimaryDense<'a, S> {
    store: &'a S,
    selection: Selection,
}

impl<'a, S> PrimaryDense<'a, S> {
    pub(crate) fn new(store: &'a S, selection: Selection) -> Self {
        Self { store, selection }
    }
}

impl<T: Element, S: SparseStore<T>> DenseExtractor<T> for PrimaryDense<'_, S> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let store = self.store;
        let values = store.primary_values(i);
        let indices = store.primary_indices(i);
        let extent = self.selection.extent(store.secondary_len());
        let out = &mut buffer[..extent];
        out.fill(T::default());

        match &self.selection {
            Selection::Full => {
                for (&x, &j) in values.iter().zip(indices) {
                    out[j] = x;
                }
            }
            Selection::Block { start, length } => {
                let (lo, hi) = bounds(indices, *start, start + length);
                for (&x, &j) in values[lo..hi].iter().zip(&indices[lo..hi]) {
                    out[j - start] = x;
                }
            }
            Selection::Index(wanted) => {
                let mut pos = 0;
                for (k, &w) in wanted.iter().enumerate() {
                    pos += indices[pos..].partition_point(|&x| x < w);
                    if pos == indices.len() {
                        break;
                    }
                    if indices[pos] == w {
                        out[k] = values[pos];
                    }
                }
            }
        }
        out
    }
}

/// Cursors into each selected primary element, tracking the lower bound of
/// the most recently requested secondary index.
struct SecondaryCore<'a, S> {
    store: &'a S,
    primaries: Vec<usize>,
    cursors: Vec<usize>,
    last: usize,
}

impl<'a, S: SparseIndices> SecondaryCore<'a, S> {
    fn new(store: &'a S, selection: &Selection) -> Self {
        let primaries = selection.to_indices(store.primary_len());
        let cursors = vec![0; primaries.len()];
        Self {
            store,
            primaries,
            cursors,
            last: 0,
        }
    }

    /// Call `hit(k, p, pos)` for every selected primary element `p` (the
    /// `k`-th in the selection) that has a non-zero at secondary index `i`,
    /// where `pos` is its position in that element's storage.
    fn search<F>(&mut self, i: usize, mut hit: F)
    where
        F: FnMut(usize, usize, usize),
    {
        let forward = i >= self.last;
        for (k, &p) in self.primaries.iter().enumerate() {
            let indices = self.store.primary_indices(p);
            let mut pos = self.cursors[k];
            if forward {
                if pos < indices.len() && indices[pos] < i {
                    pos += 1;
                    if pos < indices.len() && indices[pos] < i {
                        pos += indices[pos..].partition_point(|&x| x < i);
                    }
                }
            } else {
                pos = indices[..pos].partition_point(|&x| x < i);
            }
            self.cursors[k] = pos;
            if pos < indices.len() && indices[pos] == i {
                hit(k, p, pos);
            }
        }
        self.last = i;
    }
}

pub(crate) struct SecondarySparse<'a, S> {
    core: SecondaryCore<'a, S>,
    extract_value: bool,
    extract_index: bool,
}

impl<'a, S: SparseIndices> SecondarySparse<'a, S> {
    pub(crate) fn new(store: &'a S, selection: Selection, options: &Options) -> Self {
        Self {
            core: SecondaryCore::new(store, &selection),
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        }
    }
}

impl<T: Element, S: SparseStore<T>> SparseExtractor<T> for SecondarySparse<'_, S> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let mut count = 0;
        let store = self.core.store;
        let (extract_value, extract_index) = (self.extract_value, self.extract_index);
        self.core.search(i, |_, p, pos| {
            if extract_value {
                vbuffer[count] = store.primary_values(p)[pos];
            }
            if extract_index {
                ibuffer[count] = p;
            }
            count += 1;
        });
        SparseRange::new(
            count,
            take_prefix(extract_value, vbuffer, count),
            take_prefix(extract_index, ibuffer, count),
        )
    }
}

pub(crate) struct SecondaryDense<'a, S> {
    core: SecondaryCore<'a, S>,
}

impl<'a, S: SparseIndices> SecondaryDense<'a, S> {
    pub(crate) fn new(store: &'a S, selection: Selection) -> Self {
        Self {
            core: SecondaryCore::new(store, &selection),
        }
    }
}

impl<T: Element, S: SparseStore<T>> DenseExtractor<T> for SecondaryDense<'_, S> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let extent = self.core.primaries.len();
        let out = &mut buffer[..extent];
        out.fill(T::default());
        let store = self.core.store;
        self.core.search(i, |k, p, pos| {
            out[k] = store.primary_values(p)[pos];
        });
        out
    }
}

/// Check that every primary element has strictly increasing indices below `secondary`.
pub(crate) fn check_indices<'s, I>(elements: I, secondary: usize) -> crate::error::Result<()>
where
    I: IntoIterator<Item = &'s [usize]>,
{
    use crate::error::MatrixError;
    for (p, indices) in elements.into_iter().enumerate() {
        for w in indices.windows(2) {
            if w[0] >= w[1] {
                return Err(MatrixError::InvalidSparse(format!(
                    "indices should be strictly increasing within each primary element (element {})",
                    p
                )));
            }
        }
        if let Some(&last) = indices.last() {
            if last >= secondary {
                return Err(MatrixError::InvalidSparse(format!(
                    "index {} in element {} is out of range for secondary extent {}",
                    last, p, secondary
                )));
            }
        }
    }
    Ok(())
}
