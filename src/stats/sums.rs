//! Row and column sums.

use super::apply::{direct, running, to_f64, use_direct, Slice};
use crate::base::{Element, Matrix};
use crate::config::StatsConfig;
use crate::error::Result;
use num_traits::ToPrimitive;

#[inline]
fn accumulate(total: &mut f64, x: f64, skip_nan: bool) {
    if !(skip_nan && x.is_nan()) {
        *total += x;
    }
}

fn sums<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, row: bool, config: &StatsConfig) -> Result<Vec<f64>> {
    let skip_nan = config.skip_nan;
    if use_direct(matrix, row) {
        return direct(matrix, row, config.num_threads, |slice| {
            let values = match slice {
                Slice::Dense(v) => v,
                Slice::Sparse { values, .. } => values,
            };
            let mut total = 0.0;
            for &x in values {
                accumulate(&mut total, to_f64(x), skip_nan);
            }
            total
        });
    }

    running(
        matrix,
        row,
        config.num_threads,
        |n| vec![0.0; n],
        |totals: &mut Vec<f64>, slice| match slice {
            Slice::Dense(v) => {
                for (total, &x) in totals.iter_mut().zip(v) {
                    accumulate(total, to_f64(x), skip_nan);
                }
            }
            Slice::Sparse { values, indices } => {
                for (&x, &j) in values.iter().zip(indices) {
                    accumulate(&mut totals[j], to_f64(x), skip_nan);
                }
            }
        },
        |totals, out| out.copy_from_slice(&totals),
    )
}

/// Sum of each row.
pub fn row_sums<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    sums(matrix, true, config)
}

/// Sum of each column.
pub fn column_sums<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    sums(matrix, false, config)
}
