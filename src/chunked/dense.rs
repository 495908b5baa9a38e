//! Dense matrix stored as a regular grid of dense chunks.
//!
//! Rows (or columns) are served from "slabs": all chunks crossed by one
//! chunk-row (or chunk-column), unpacked for the requested selection. Slabs
//! are kept in an LRU cache so that consecutive requests within the same
//! chunk-row only unpack the chunks once. With an oracle, the slab cache
//! follows the predicted sequence instead.

use super::lru::LruChunkCache;
use super::oracle::OracleSlabCache;
use crate::base::{
    DenseExtractor, Element, Matrix, Options, Oracle, OracularDenseExtractor, PseudoOracularDense, Selection,
    SparseExtractor,
};
use crate::config::ChunkedOptions;
use crate::dense::SparsifiedWrapper;
use crate::error::{MatrixError, Result};
use std::sync::Arc;
use tracing::debug;

/// One chunk of a [`ChunkedDenseMatrix`]; every chunk has the full chunk
/// dimensions, with padding beyond the matrix edge ignored.
#[derive(Debug, Clone)]
pub struct DenseChunk<T> {
    values: Vec<T>,
    row_major: bool,
}

impl<T: Element> DenseChunk<T> {
    pub fn new(values: Vec<T>, row_major: bool) -> Self {
        Self { values, row_major }
    }

    #[inline]
    fn get(&self, r: usize, c: usize, chunk_nrow: usize, chunk_ncol: usize) -> T {
        if self.row_major {
            self.values[r * chunk_ncol + c]
        } else {
            self.values[c * chunk_nrow + r]
        }
    }
}

pub struct ChunkedDenseMatrix<T> {
    nrow: usize,
    ncol: usize,
    chunk_nrow: usize,
    chunk_ncol: usize,
    nrow_in_chunks: usize,
    ncol_in_chunks: usize,
    /// Row-major over the chunk grid.
    chunks: Vec<DenseChunk<T>>,
    options: ChunkedOptions,
}

impl<T: Element> ChunkedDenseMatrix<T> {
    /// `chunks` are ordered row-major over the grid of
    /// `ceil(nrow / chunk_nrow)` by `ceil(ncol / chunk_ncol)` chunks.
    pub fn new(
        nrow: usize,
        ncol: usize,
        chunk_nrow: usize,
        chunk_ncol: usize,
        chunks: Vec<DenseChunk<T>>,
        options: ChunkedOptions,
    ) -> Result<Self> {
        if (chunk_nrow == 0 && nrow > 0) || (chunk_ncol == 0 && ncol > 0) {
            return Err(MatrixError::InvalidArgument(
                "chunk dimensions should be positive for a non-empty matrix".to_string(),
            ));
        }
        let nrow_in_chunks = if nrow == 0 { 0 } else { nrow.div_ceil(chunk_nrow) };
        let ncol_in_chunks = if ncol == 0 { 0 } else { ncol.div_ceil(chunk_ncol) };

        if chunks.len() != nrow_in_chunks * ncol_in_chunks {
            return Err(MatrixError::DimensionMismatch(format!(
                "expected {} x {} chunks, got {}",
                nrow_in_chunks,
                ncol_in_chunks,
                chunks.len()
            )));
        }
        let chunk_size = chunk_nrow * chunk_ncol;
        if let Some(bad) = chunks.iter().position(|c| c.values.len() != chunk_size) {
            return Err(MatrixError::DimensionMismatch(format!(
                "chunk {} has {} values, expected {}",
                bad,
                chunks[bad].values.len(),
                chunk_size
            )));
        }

        debug!(
            "Chunked matrix {}x{} in {}x{} chunks of {}x{}",
            nrow, ncol, nrow_in_chunks, ncol_in_chunks, chunk_nrow, chunk_ncol
        );
        Ok(Self {
            nrow,
            ncol,
            chunk_nrow,
            chunk_ncol,
            nrow_in_chunks,
            ncol_in_chunks,
            chunks,
            options,
        })
    }

    /// Number of chunks along the rows and along the columns.
    pub fn grid(&self) -> (usize, usize) {
        (self.nrow_in_chunks, self.ncol_in_chunks)
    }

    fn primary_chunkdim(&self, row: bool) -> usize {
        if row {
            self.chunk_nrow
        } else {
            self.chunk_ncol
        }
    }

    /// Number of slabs that fit in the cache for slabs of `slab_len` elements.
    fn slabs_in_cache(&self, slab_len: usize) -> usize {
        let elements = self.options.maximum_cache_size / std::mem::size_of::<T>().max(1);
        let n = if slab_len == 0 { 0 } else { elements / slab_len };
        if n == 0 && self.options.require_minimum_cache {
            1
        } else {
            n
        }
    }

    /// Unpack the selected elements of primary positions `[first, first + count)`
    /// into `out`, one run of `extent` elements per primary position.
    fn unpack(&self, row: bool, first: usize, count: usize, selection: &Selection, extent: usize, out: &mut [T]) {
        let full = if row { self.ncol } else { self.nrow };
        let chunk_id = first / self.primary_chunkdim(row);
        let offset = first % self.primary_chunkdim(row);
        let secondary_chunkdim = self.primary_chunkdim(!row);

        for (k, j) in selection.iter(full).enumerate() {
            let (sc, sj) = (j / secondary_chunkdim, j % secondary_chunkdim);
            let chunk = if row {
                &self.chunks[chunk_id * self.ncol_in_chunks + sc]
            } else {
                &self.chunks[sc * self.ncol_in_chunks + chunk_id]
            };
            for p in 0..count {
                out[p * extent + k] = if row {
                    chunk.get(offset + p, sj, self.chunk_nrow, self.chunk_ncol)
                } else {
                    chunk.get(sj, offset + p, self.chunk_nrow, self.chunk_ncol)
                };
            }
        }
    }
}

/// Extraction without a cache: each request unpacks only the requested row/column.
struct DirectDense<'a, T> {
    parent: &'a ChunkedDenseMatrix<T>,
    row: bool,
    selection: Selection,
    extent: usize,
}

impl<T: Element> DenseExtractor<T> for DirectDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let out = &mut buffer[..self.extent];
        self.parent.unpack(self.row, i, 1, &self.selection, self.extent, out);
        out
    }
}

struct CachedDense<'a, T> {
    parent: &'a ChunkedDenseMatrix<T>,
    row: bool,
    selection: Selection,
    extent: usize,
    cache: LruChunkCache<usize, Vec<T>>,
}

impl<T: Element> DenseExtractor<T> for CachedDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, _buffer: &'b mut [T]) -> &'b [T] {
        let parent = self.parent;
        let (row, extent) = (self.row, self.extent);
        let chunkdim = parent.primary_chunkdim(row);
        let primary = parent.target_dim(row);
        let selection = &self.selection;

        let slab = self.cache.find_chunk(
            i / chunkdim,
            || vec![T::default(); chunkdim * extent],
            |id, slab| {
                let first = id * chunkdim;
                let count = chunkdim.min(primary - first);
                parent.unpack(row, first, count, selection, extent, slab);
            },
        );
        let offset = (i % chunkdim) * extent;
        &slab[offset..offset + extent]
    }
}

struct OracularCachedDense<'a, T> {
    parent: &'a ChunkedDenseMatrix<T>,
    row: bool,
    selection: Selection,
    extent: usize,
    cache: OracleSlabCache<Vec<T>>,
}

impl<T: Element> OracularDenseExtractor<T> for OracularCachedDense<'_, T> {
    fn fetch<'b>(&'b mut self, buffer: &'b mut [T]) -> &'b [T] {
        let parent = self.parent;
        let (row, extent) = (self.row, self.extent);
        let chunkdim = parent.primary_chunkdim(row);
        let primary = parent.target_dim(row);
        let selection = &self.selection;

        let next = self.cache.next_chunk(
            |i| (i / chunkdim, i % chunkdim),
            || vec![T::default(); chunkdim * extent],
            |id, slab| {
                let first = id * chunkdim;
                let count = chunkdim.min(primary - first);
                parent.unpack(row, first, count, selection, extent, slab);
            },
        );
        match next {
            Some((slab, offset)) => &slab[offset * extent..(offset + 1) * extent],
            None => &buffer[..0],
        }
    }
}

impl<T: Element> Matrix<T> for ChunkedDenseMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        false
    }

    /// Rows are preferred when a row crosses fewer chunks than a column.
    fn prefer_rows(&self) -> bool {
        self.nrow_in_chunks > self.ncol_in_chunks
    }

    fn dense(&self, row: bool, selection: Selection, _options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        let extent = selection.extent(self.non_target_dim(row));
        let slab_len = self.primary_chunkdim(row) * extent;
        let nslabs = self.slabs_in_cache(slab_len);

        if nslabs == 0 {
            return Box::new(DirectDense {
                parent: self,
                row,
                selection,
                extent,
            });
        }
        Box::new(CachedDense {
            parent: self,
            row,
            selection,
            extent,
            cache: LruChunkCache::new(nslabs.min(self.primary_chunks(row).max(1))),
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        let full = self.non_target_dim(row);
        let dense = self.dense(row, selection.clone(), options);
        Box::new(SparsifiedWrapper::new(dense, &selection, full, options))
    }

    fn uses_oracle(&self, _row: bool) -> bool {
        true
    }

    fn dense_oracular(
        &self,
        row: bool,
        oracle: Arc<dyn Oracle>,
        selection: Selection,
        options: &Options,
    ) -> Box<dyn OracularDenseExtractor<T> + '_> {
        let extent = selection.extent(self.non_target_dim(row));
        let chunkdim = self.primary_chunkdim(row);
        let nslabs = self.slabs_in_cache(chunkdim * extent);

        if nslabs == 0 {
            return Box::new(PseudoOracularDense::new(oracle, self.dense(row, selection, options)));
        }
        let nslabs = nslabs.min(self.primary_chunks(row).max(1));
        Box::new(OracularCachedDense {
            parent: self,
            row,
            selection,
            extent,
            cache: OracleSlabCache::new(oracle, nslabs * chunkdim, nslabs),
        })
    }
}

impl<T: Element> ChunkedDenseMatrix<T> {
    fn primary_chunks(&self, row: bool) -> usize {
        if row {
            self.nrow_in_chunks
        } else {
            self.ncol_in_chunks
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{ConsecutiveOracle, FixedOracle};
    use crate::dense::DenseMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Chop a row-major `nrow` x `ncol` array into chunks, padding with zeros.
    fn chop(
        nrow: usize,
        ncol: usize,
        values: &[f64],
        chunk_nrow: usize,
        chunk_ncol: usize,
        row_major_chunks: bool,
    ) -> Vec<DenseChunk<f64>> {
        let mut chunks = Vec::new();
        for cr in 0..nrow.div_ceil(chunk_nrow) {
            for cc in 0..ncol.div_ceil(chunk_ncol) {
                let mut contents = vec![0.0; chunk_nrow * chunk_ncol];
                for r in 0..chunk_nrow {
                    for c in 0..chunk_ncol {
                        let (gr, gc) = (cr * chunk_nrow + r, cc * chunk_ncol + c);
                        if gr < nrow && gc < ncol {
                            let pos = if row_major_chunks { r * chunk_ncol + c } else { c * chunk_nrow + r };
                            contents[pos] = values[gr * ncol + gc];
                        }
                    }
                }
                chunks.push(DenseChunk::new(contents, row_major_chunks));
            }
        }
        chunks
    }

    fn check_against_reference(options: ChunkedOptions, row_major_chunks: bool) {
        let (nrow, ncol) = (23, 17);
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<f64> = (0..nrow * ncol).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let reference = DenseMatrix::row_major(nrow, ncol, values.clone()).unwrap();
        let chunked = ChunkedDenseMatrix::new(nrow, ncol, 5, 4, chop(nrow, ncol, &values, 5, 4, row_major_chunks), options).unwrap();

        for row in [true, false] {
            for selection in [Selection::Full, Selection::block(2, 9), Selection::index(vec![0, 3, 4, 10, 15])] {
                let extent = selection.extent(reference.non_target_dim(row));
                let mut expected = reference.dense(row, selection.clone(), &Options::default());
                let mut observed = chunked.dense(row, selection.clone(), &Options::default());
                let mut ebuf = vec![0.0; extent];
                let mut obuf = vec![0.0; extent];
                // Revisit earlier positions to exercise cache hits and evictions.
                let order: Vec<usize> = (0..reference.target_dim(row)).chain([0, 12, 3, 20, 1]).collect();
                for i in order {
                    let i = i % reference.target_dim(row);
                    assert_eq!(observed.fetch(i, &mut obuf), expected.fetch(i, &mut ebuf));
                }
            }
        }
    }

    #[test]
    fn test_cached_extraction() {
        check_against_reference(ChunkedOptions::default(), true);
        check_against_reference(ChunkedOptions::default(), false);
    }

    #[test]
    fn test_minimal_cache() {
        let options = ChunkedOptions {
            maximum_cache_size: 0,
            require_minimum_cache: true,
        };
        check_against_reference(options, true);
    }

    #[test]
    fn test_no_cache() {
        let options = ChunkedOptions {
            maximum_cache_size: 0,
            require_minimum_cache: false,
        };
        check_against_reference(options, false);
    }

    fn check_oracular(options: ChunkedOptions, row_major_chunks: bool) {
        let (nrow, ncol) = (23, 17);
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f64> = (0..nrow * ncol).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let reference = DenseMatrix::row_major(nrow, ncol, values.clone()).unwrap();
        let chunked = ChunkedDenseMatrix::new(nrow, ncol, 5, 4, chop(nrow, ncol, &values, 5, 4, row_major_chunks), options).unwrap();
        assert!(chunked.uses_oracle(true));

        for row in [true, false] {
            let ntarget = reference.target_dim(row);
            // Jumps between chunks and comes back to earlier ones.
            let sequence: Vec<usize> = [0, 1, 9, 2, 16, 0, 10, 11, 4, 16, 3, 15, 15, 8, 0]
                .iter()
                .map(|&i| i % ntarget)
                .collect();
            let oracles: [Arc<dyn Oracle>; 2] = [
                Arc::new(FixedOracle::new(sequence.clone())),
                Arc::new(ConsecutiveOracle::new(2, ntarget - 2)),
            ];
            let orders = [sequence, (2..ntarget).collect::<Vec<_>>()];

            for (oracle, order) in oracles.into_iter().zip(orders) {
                for selection in [Selection::Full, Selection::block(1, 7), Selection::index(vec![0, 2, 5, 11, 16])] {
                    let extent = selection.extent(reference.non_target_dim(row));
                    let mut expected = reference.dense(row, selection.clone(), &Options::default());
                    let mut observed = chunked.dense_oracular(row, oracle.clone(), selection, &Options::default());
                    let mut ebuf = vec![0.0; extent];
                    let mut obuf = vec![0.0; extent];
                    for &i in &order {
                        assert_eq!(observed.fetch(&mut obuf), expected.fetch(i, &mut ebuf));
                    }
                }
            }
        }
    }

    #[test]
    fn test_oracular_extraction() {
        check_oracular(ChunkedOptions::default(), true);
        check_oracular(ChunkedOptions::default(), false);

        // Room for a single slab forces a reload on every revisit.
        let options = ChunkedOptions {
            maximum_cache_size: 0,
            require_minimum_cache: true,
        };
        check_oracular(options, true);

        let options = ChunkedOptions {
            maximum_cache_size: 0,
            require_minimum_cache: false,
        };
        check_oracular(options, false);
    }

    #[test]
    fn test_validation_and_preference() {
        let chunks = vec![DenseChunk::new(vec![0.0; 6], true); 4];
        assert!(ChunkedDenseMatrix::new(4, 6, 2, 3, chunks.clone(), ChunkedOptions::default()).is_ok());
        assert!(ChunkedDenseMatrix::new(5, 6, 2, 3, chunks.clone(), ChunkedOptions::default()).is_err());
        assert!(ChunkedDenseMatrix::new(4, 6, 3, 2, chunks, ChunkedOptions::default()).is_err());

        let chunks = vec![DenseChunk::new(vec![0.0; 4], false); 3];
        let mat = ChunkedDenseMatrix::new(6, 2, 2, 2, chunks, ChunkedOptions::default()).unwrap();
        assert_eq!(mat.grid(), (3, 1));
        assert!(mat.prefer_rows());
        assert!(!mat.is_sparse());
    }
}
