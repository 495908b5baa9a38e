//! Delayed combining of matrices along rows or columns.

use crate::base::{
    take_prefix, DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix,
    SparseExtractor, SparseRange,
};
use crate::error::{MatrixError, Result};
use std::sync::Arc;
use tracing::debug;

/// Concatenation of matrices by row (`by_row = true`, stacking vertically)
/// or by column.
pub struct DelayedBind<T: Element> {
    mats: Vec<SharedMatrix<T>>,
    /// `cumulative[k]` is the first row/column of component `k`.
    cumulative: Vec<usize>,
    by_row: bool,
    otherdim: usize,
    sparse_prop: f64,
    row_prop: f64,
    uses_oracle: [bool; 2],
}

impl<T: Element> DelayedBind<T> {
    /// All components must have the same number of columns (`by_row = true`)
    /// or rows. Components with no rows (columns) are dropped.
    pub fn new(mats: Vec<SharedMatrix<T>>, by_row: bool) -> Result<Self> {
        let mut otherdim = 0;
        let mut kept = Vec::with_capacity(mats.len());
        let mut cumulative = vec![0];

        for (k, mat) in mats.into_iter().enumerate() {
            let primary = mat.target_dim(by_row);
            let secondary = mat.non_target_dim(by_row);
            if k == 0 {
                otherdim = secondary;
            } else if otherdim != secondary {
                return Err(MatrixError::DimensionMismatch(format!(
                    "all matrices should have the same number of {}",
                    if by_row { "columns" } else { "rows" }
                )));
            }
            if primary > 0 {
                let last = *cumulative.last().unwrap_or(&0);
                cumulative.push(last + primary);
                kept.push(mat);
            }
        }

        let mut denom = 0.0;
        let mut sparse_prop = 0.0;
        let mut row_prop = 0.0;
        for mat in &kept {
            let total = (mat.nrow() * mat.ncol()) as f64;
            denom += total;
            sparse_prop += total * mat.is_sparse_proportion();
            row_prop += total * mat.prefer_rows_proportion();
        }
        if denom > 0.0 {
            sparse_prop /= denom;
            row_prop /= denom;
        }

        let uses_oracle = [
            kept.iter().any(|m| m.uses_oracle(false)),
            kept.iter().any(|m| m.uses_oracle(true)),
        ];

        debug!("Binding {} matrices (by_row = {})", kept.len(), by_row);
        Ok(Self {
            mats: kept,
            cumulative,
            by_row,
            otherdim,
            sparse_prop,
            row_prop,
            uses_oracle,
        })
    }

    /// Total extent along the bind dimension.
    fn bound_extent(&self) -> usize {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Component containing position `i` along the bind dimension.
    fn component(cumulative: &[usize], i: usize) -> usize {
        cumulative.partition_point(|&c| c <= i) - 1
    }

    /// Split a selection along the bind dimension into per-component
    /// selections, returning (component, local selection, extent).
    fn split(&self, selection: &Selection) -> Vec<(usize, Selection, usize)> {
        let mut parts = Vec::new();
        match selection {
            Selection::Full => {
                for k in 0..self.mats.len() {
                    let len = self.cumulative[k + 1] - self.cumulative[k];
                    parts.push((k, Selection::Full, len));
                }
            }
            Selection::Block { start, length } => {
                if *length == 0 {
                    return parts;
                }
                let end = start + length;
                let first = Self::component(&self.cumulative, *start);
                for k in first..self.mats.len() {
                    let (lo, hi) = (self.cumulative[k], self.cumulative[k + 1]);
                    if lo >= end {
                        break;
                    }
                    let s = (*start).max(lo);
                    let e = end.min(hi);
                    parts.push((k, Selection::block(s - lo, e - s), e - s));
                }
            }
            Selection::Index(indices) => {
                let mut pos = 0;
                while pos < indices.len() {
                    let k = Self::component(&self.cumulative, indices[pos]);
                    let (lo, hi) = (self.cumulative[k], self.cumulative[k + 1]);
                    let mut local = Vec::new();
                    while pos < indices.len() && indices[pos] < hi {
                        local.push(indices[pos] - lo);
                        pos += 1;
                    }
                    let len = local.len();
                    parts.push((k, Selection::index(local), len));
                }
            }
        }
        parts
    }
}

/// Extraction along the bind dimension: each request goes to one component.
struct ParallelDense<'a, T> {
    cumulative: &'a [usize],
    extractors: Vec<Box<dyn DenseExtractor<T> + 'a>>,
}

impl<T: Element> DenseExtractor<T> for ParallelDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let k = DelayedBind::<T>::component(self.cumulative, i);
        self.extractors[k].fetch(i - self.cumulative[k], buffer)
    }
}

struct ParallelSparse<'a, T> {
    cumulative: &'a [usize],
    extractors: Vec<Box<dyn SparseExtractor<T> + 'a>>,
}

impl<T: Element> SparseExtractor<T> for ParallelSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let k = DelayedBind::<T>::component(self.cumulative, i);
        self.extractors[k].fetch(i - self.cumulative[k], vbuffer, ibuffer)
    }
}

/// Extraction across the bind dimension: every component contributes a piece.
struct PerpendicularDense<'a, T> {
    parts: Vec<(Box<dyn DenseExtractor<T> + 'a>, usize)>,
    holding: Vec<T>,
}

impl<T: Element> DenseExtractor<T> for PerpendicularDense<'_, T> {
    fn fetch<'b>(&'b mut self, i: usize, buffer: &'b mut [T]) -> &'b [T] {
        let mut offset = 0;
        for (ext, len) in self.parts.iter_mut() {
            let src = ext.fetch(i, &mut self.holding);
            buffer[offset..offset + *len].copy_from_slice(&src[..*len]);
            offset += *len;
        }
        &buffer[..offset]
    }
}

struct PerpendicularSparse<'a, T> {
    /// Extractor and the position of its first row/column in the bound matrix.
    parts: Vec<(Box<dyn SparseExtractor<T> + 'a>, usize)>,
    vholding: Vec<T>,
    iholding: Vec<usize>,
    extract_value: bool,
    extract_index: bool,
}

impl<T: Element> SparseExtractor<T> for PerpendicularSparse<'_, T> {
    fn fetch<'b>(
        &'b mut self,
        i: usize,
        vbuffer: &'b mut [T],
        ibuffer: &'b mut [usize],
    ) -> SparseRange<'b, T> {
        let mut count = 0;
        for (ext, shift) in self.parts.iter_mut() {
            let range = ext.fetch(i, &mut self.vholding, &mut self.iholding);
            if let Some(values) = range.value {
                vbuffer[count..count + range.number].copy_from_slice(values);
            }
            if let Some(indices) = range.index {
                for (o, &x) in ibuffer[count..count + range.number].iter_mut().zip(indices) {
                    *o = x + *shift;
                }
            }
            count += range.number;
        }
        SparseRange::new(
            count,
            take_prefix(self.extract_value, vbuffer, count),
            take_prefix(self.extract_index, ibuffer, count),
        )
    }
}

impl<T: Element> Matrix<T> for DelayedBind<T> {
    fn nrow(&self) -> usize {
        if self.by_row {
            self.bound_extent()
        } else {
            self.otherdim
        }
    }

    fn ncol(&self) -> usize {
        if self.by_row {
            self.otherdim
        } else {
            self.bound_extent()
        }
    }

    fn is_sparse(&self) -> bool {
        self.sparse_prop > 0.5
    }

    fn is_sparse_proportion(&self) -> f64 {
        self.sparse_prop
    }

    fn prefer_rows(&self) -> bool {
        self.row_prop > 0.5
    }

    fn prefer_rows_proportion(&self) -> f64 {
        self.row_prop
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.uses_oracle[row as usize]
    }

    fn dense(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn DenseExtractor<T> + '_> {
        if row == self.by_row {
            let extractors = self
                .mats
                .iter()
                .map(|m| m.dense(row, selection.clone(), options))
                .collect();
            return Box::new(ParallelDense {
                cumulative: &self.cumulative,
                extractors,
            });
        }

        let parts = self.split(&selection);
        let widest = parts.iter().map(|p| p.2).max().unwrap_or(0);
        let parts = parts
            .into_iter()
            .map(|(k, sel, len)| (self.mats[k].dense(row, sel, options), len))
            .collect();
        Box::new(PerpendicularDense {
            parts,
            holding: vec![T::default(); widest],
        })
    }

    fn sparse(&self, row: bool, selection: Selection, options: &Options) -> Box<dyn SparseExtractor<T> + '_> {
        if row == self.by_row {
            let extractors = self
                .mats
                .iter()
                .map(|m| m.sparse(row, selection.clone(), options))
                .collect();
            return Box::new(ParallelSparse {
                cumulative: &self.cumulative,
                extractors,
            });
        }

        let parts = self.split(&selection);
        let widest = parts.iter().map(|p| p.2).max().unwrap_or(0);
        let parts = parts
            .into_iter()
            .map(|(k, sel, _)| (self.mats[k].sparse(row, sel, options), self.cumulative[k]))
            .collect();
        Box::new(PerpendicularSparse {
            parts,
            vholding: vec![T::default(); if options.sparse_extract_value { widest } else { 0 }],
            iholding: vec![0; if options.sparse_extract_index { widest } else { 0 }],
            extract_value: options.sparse_extract_value,
            extract_index: options.sparse_extract_index,
        })
    }
}

/// Convenience wrapper returning the bound matrix behind a shared handle.
pub fn make_delayed_bind<T: Element>(mats: Vec<SharedMatrix<T>>, by_row: bool) -> Result<SharedMatrix<T>> {
    Ok(Arc::new(DelayedBind::new(mats, by_row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::CompressedSparseMatrix;

    fn components() -> Vec<SharedMatrix<f64>> {
        // 2 x 3 dense, 0 x 3 empty, 3 x 3 sparse.
        let a: SharedMatrix<f64> =
            Arc::new(DenseMatrix::row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap());
        let empty: SharedMatrix<f64> = Arc::new(DenseMatrix::row_major(0, 3, vec![]).unwrap());
        let b: SharedMatrix<f64> = Arc::new(CompressedSparseMatrix::csr(
            3,
            3,
            vec![7.0, 8.0, 9.0],
            vec![0, 2, 1],
            vec![0, 1, 2, 3],
        )
        .unwrap());
        vec![a, empty, b]
    }

    #[test]
    fn test_dimensions() {
        let bound = DelayedBind::new(components(), true).unwrap();
        assert_eq!(bound.nrow(), 5);
        assert_eq!(bound.ncol(), 3);
        assert_eq!(bound.mats.len(), 2);
        // 6 dense elements vs 9 sparse elements.
        assert!((bound.is_sparse_proportion() - 0.6).abs() < 1e-12);
        assert!(bound.is_sparse());
        assert!(bound.prefer_rows());
    }

    #[test]
    fn test_mismatch() {
        let a: SharedMatrix<f64> = Arc::new(DenseMatrix::row_major(1, 2, vec![1.0, 2.0]).unwrap());
        let b: SharedMatrix<f64> = Arc::new(DenseMatrix::row_major(1, 3, vec![1.0, 2.0, 3.0]).unwrap());
        assert!(DelayedBind::new(vec![a.clone(), b.clone()], true).is_err());
        assert!(DelayedBind::new(vec![a, b], false).is_ok());
    }

    #[test]
    fn test_parallel_extraction() {
        let bound = DelayedBind::new(components(), true).unwrap();
        let mut buffer = vec![0.0; 3];
        let mut ext = bound.dense_row();
        assert_eq!(ext.fetch(1, &mut buffer), &[4.0, 5.0, 6.0]);
        assert_eq!(ext.fetch(3, &mut buffer), &[0.0, 0.0, 8.0]);

        let mut vbuffer = vec![0.0; 3];
        let mut ibuffer = vec![0; 3];
        let mut ext = bound.sparse_row();
        let range = ext.fetch(4, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[9.0]);
        assert_eq!(range.index.unwrap(), &[1]);
    }

    #[test]
    fn test_perpendicular_extraction() {
        let bound = DelayedBind::new(components(), true).unwrap();
        let mut buffer = vec![0.0; 5];
        let mut ext = bound.dense_column();
        assert_eq!(ext.fetch(0, &mut buffer), &[1.0, 4.0, 7.0, 0.0, 0.0]);

        let mut ext = bound.dense(false, Selection::block(1, 3), &Options::default());
        assert_eq!(ext.fetch(2, &mut buffer), &[6.0, 0.0, 8.0]);

        let mut ext = bound.dense(false, Selection::index(vec![0, 4]), &Options::default());
        assert_eq!(ext.fetch(1, &mut buffer), &[2.0, 9.0]);

        let mut vbuffer = vec![0.0; 5];
        let mut ibuffer = vec![0; 5];
        let mut ext = bound.sparse(false, Selection::block(1, 4), &Options::default());
        let range = ext.fetch(1, &mut vbuffer, &mut ibuffer);
        assert_eq!(range.value.unwrap(), &[5.0, 9.0]);
        assert_eq!(range.index.unwrap(), &[1, 4]);
    }

    #[test]
    fn test_no_components() {
        let bound = DelayedBind::<f64>::new(vec![], false).unwrap();
        assert_eq!(bound.nrow(), 0);
        assert_eq!(bound.ncol(), 0);
        assert!(!bound.is_sparse());
    }
}
