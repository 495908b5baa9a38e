//! Row and column medians.

use super::apply::{direct, to_f64, Slice};
use crate::base::{Element, Matrix};
use crate::config::StatsConfig;
use crate::error::Result;
use num_traits::ToPrimitive;

/// Median of `values` plus `nzero` implicit zeros. `values` is reordered.
///
/// Returns NaN when there are no observations or when `values` contains NaN.
pub fn median_with_zeros(values: &mut [f64], nzero: usize) -> f64 {
    let total = values.len() + nzero;
    if total == 0 || values.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    values.sort_unstable_by(f64::total_cmp);

    // Zeros sit between the negative and the positive values.
    let zeropos = values.partition_point(|&x| x < 0.0);
    let at = |k: usize| -> f64 {
        if k < zeropos {
            values[k]
        } else if k < zeropos + nzero {
            0.0
        } else {
            values[k - nzero]
        }
    };

    let half = total / 2;
    if total % 2 == 1 {
        at(half)
    } else {
        (at(half - 1) + at(half)) / 2.0
    }
}

/// Median of each row (`row = true`) or column, always computed directly.
fn medians<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, row: bool, config: &StatsConfig) -> Result<Vec<f64>> {
    let skip_nan = config.skip_nan;
    let otherdim = matrix.non_target_dim(row);
    direct(matrix, row, config.num_threads, |slice| {
        let (values, nzero) = match slice {
            Slice::Dense(v) => (v, 0),
            Slice::Sparse { values, .. } => (values, otherdim - values.len()),
        };
        let mut work: Vec<f64> = values
            .iter()
            .map(|&x| to_f64(x))
            .filter(|x| !(skip_nan && x.is_nan()))
            .collect();
        median_with_zeros(&mut work, nzero)
    })
}

/// Median of each row.
pub fn row_medians<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    medians(matrix, true, config)
}

/// Median of each column.
pub fn column_medians<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    medians(matrix, false, config)
}
