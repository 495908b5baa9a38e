//! Selections along the non-target dimension and extraction options.

use crate::error::{MatrixError, Result};
use std::ops::Range;
use std::sync::Arc;

/// Which elements of each row/column an extractor should return.
///
/// `Index` selections must be sorted and free of duplicates; positions
/// are always absolute, never relative to the start of a block.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    Full,
    Block { start: usize, length: usize },
    Index(Arc<Vec<usize>>),
}

impl Selection {
    pub fn block(start: usize, length: usize) -> Self {
        Selection::Block { start, length }
    }

    pub fn index(indices: Vec<usize>) -> Self {
        Selection::Index(Arc::new(indices))
    }

    /// Number of elements extracted from a dimension of length `full`.
    pub fn extent(&self, full: usize) -> usize {
        match self {
            Selection::Full => full,
            Selection::Block { length, .. } => *length,
            Selection::Index(indices) => indices.len(),
        }
    }

    /// Check that the selection fits in a dimension of length `full`.
    pub fn validate(&self, full: usize) -> Result<()> {
        match self {
            Selection::Full => Ok(()),
            Selection::Block { start, length } => {
                if start.checked_add(*length).map_or(true, |end| end > full) {
                    return Err(MatrixError::InvalidSelection(format!(
                        "block [{}, {}+{}) exceeds extent {}",
                        start, start, length, full
                    )));
                }
                Ok(())
            }
            Selection::Index(indices) => {
                for w in indices.windows(2) {
                    if w[0] >= w[1] {
                        return Err(MatrixError::InvalidSelection(
                            "indices should be sorted and unique".to_string(),
                        ));
                    }
                }
                if let Some(&last) = indices.last() {
                    if last >= full {
                        return Err(MatrixError::IndexOutOfRange {
                            index: last,
                            extent: full,
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Iterate over the absolute positions covered by this selection.
    pub fn iter(&self, full: usize) -> SelectionIter<'_> {
        match self {
            Selection::Full => SelectionIter::Range(0..full),
            Selection::Block { start, length } => SelectionIter::Range(*start..*start + *length),
            Selection::Index(indices) => SelectionIter::Index(indices.iter()),
        }
    }

    /// Materialize the selected positions.
    pub fn to_indices(&self, full: usize) -> Vec<usize> {
        self.iter(full).collect()
    }

    /// Whether position `x` falls inside the selection.
    pub fn contains(&self, x: usize, full: usize) -> bool {
        match self {
            Selection::Full => x < full,
            Selection::Block { start, length } => x >= *start && x < start + length,
            Selection::Index(indices) => indices.binary_search(&x).is_ok(),
        }
    }
}

/// Iterator returned by [`Selection::iter`].
pub enum SelectionIter<'a> {
    Range(Range<usize>),
    Index(std::slice::Iter<'a, usize>),
}

impl Iterator for SelectionIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            SelectionIter::Range(r) => r.next(),
            SelectionIter::Index(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SelectionIter::Range(r) => r.size_hint(),
            SelectionIter::Index(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for SelectionIter<'_> {}

/// Options controlling sparse extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Report the values of structural non-zeros.
    pub sparse_extract_value: bool,
    /// Report the positions of structural non-zeros.
    pub sparse_extract_index: bool,
    /// Positions must be reported in increasing order.
    pub sparse_ordered_index: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sparse_extract_value: true,
            sparse_extract_index: true,
            sparse_ordered_index: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_and_iter() {
        assert_eq!(Selection::Full.extent(7), 7);
        assert_eq!(Selection::block(2, 3).extent(7), 3);
        assert_eq!(Selection::index(vec![1, 4]).extent(7), 2);

        assert_eq!(Selection::block(2, 3).to_indices(7), vec![2, 3, 4]);
        assert_eq!(Selection::Full.to_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn test_validate() {
        assert!(Selection::block(5, 3).validate(7).is_err());
        assert!(Selection::block(4, 3).validate(7).is_ok());
        assert!(Selection::index(vec![3, 1]).validate(7).is_err());
        assert!(Selection::index(vec![1, 1]).validate(7).is_err());
        assert!(Selection::index(vec![1, 7]).validate(7).is_err());
        assert!(Selection::index(vec![]).validate(0).is_ok());
    }

    #[test]
    fn test_contains() {
        let sel = Selection::index(vec![0, 5, 9]);
        assert!(sel.contains(5, 10));
        assert!(!sel.contains(4, 10));
        assert!(Selection::block(3, 2).contains(4, 10));
        assert!(!Selection::block(3, 2).contains(5, 10));
    }
}
