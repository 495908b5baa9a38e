//! Conversion of (row, column, value) triplets into compressed sparse layout.

use crate::error::{MatrixError, Result};

enum Ordering {
    Sorted,
    PrimarySorted,
    Unsorted,
}

fn ordering(primary: &[usize], secondary: &[usize]) -> Ordering {
    if primary.windows(2).any(|w| w[0] > w[1]) {
        return Ordering::Unsorted;
    }
    for (p, s) in primary.windows(2).zip(secondary.windows(2)) {
        if p[0] == p[1] && s[0] > s[1] {
            return Ordering::PrimarySorted;
        }
    }
    Ordering::Sorted
}

/// Sort triplets in place by (primary, secondary) and return the pointer
/// array of the compressed layout.
///
/// With `csr = true` the rows are primary and the pointers have length
/// `nrow + 1`; otherwise the columns are primary and the pointers have
/// length `ncol + 1`. `values`, `rows` and `columns` are permuted together
/// so that they can be passed straight to
/// [`CompressedSparseMatrix::new`](super::CompressedSparseMatrix::new),
/// using `columns` (CSR) or `rows` (CSC) as the indices.
pub fn compress_sparse_triplets<T>(
    nrow: usize,
    ncol: usize,
    values: &mut [T],
    rows: &mut [usize],
    columns: &mut [usize],
    csr: bool,
) -> Result<Vec<usize>> {
    let n = values.len();
    if rows.len() != n || columns.len() != n {
        return Err(MatrixError::DimensionMismatch(
            "'rows', 'columns' and 'values' should have the same length".to_string(),
        ));
    }
    if let Some(&r) = rows.iter().find(|&&r| r >= nrow) {
        return Err(MatrixError::IndexOutOfRange { index: r, extent: nrow });
    }
    if let Some(&c) = columns.iter().find(|&&c| c >= ncol) {
        return Err(MatrixError::IndexOutOfRange { index: c, extent: ncol });
    }

    let (primary, secondary): (&[usize], &[usize]) = if csr {
        (rows, columns)
    } else {
        (columns, rows)
    };

    let status = ordering(primary, secondary);
    if !matches!(status, Ordering::Sorted) {
        let mut order: Vec<usize> = (0..n).collect();
        match status {
            Ordering::PrimarySorted => {
                let mut start = 0;
                while start < n {
                    let mut end = start + 1;
                    while end < n && primary[end] == primary[start] {
                        end += 1;
                    }
                    order[start..end].sort_by_key(|&k| secondary[k]);
                    start = end;
                }
            }
            _ => order.sort_by_key(|&k| (primary[k], secondary[k])),
        }

        // Apply the permutation cycle by cycle, so no copies of the data are made.
        let mut used = vec![false; n];
        for i in 0..n {
            if used[i] {
                continue;
            }
            used[i] = true;
            let mut current = i;
            let mut replacement = order[i];
            while replacement != i {
                rows.swap(current, replacement);
                columns.swap(current, replacement);
                values.swap(current, replacement);
                current = replacement;
                used[current] = true;
                replacement = order[replacement];
            }
        }
    }

    let primary = if csr { &*rows } else { &*columns };
    let mut pointers = vec![0usize; if csr { nrow } else { ncol } + 1];
    for &p in primary {
        pointers[p + 1] += 1;
    }
    for i in 1..pointers.len() {
        pointers[i] += pointers[i - 1];
    }
    Ok(pointers)
}
