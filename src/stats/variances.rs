//! Row and column sample variances.
//!
//! Direct computation uses the two-pass sum of squared differences; running
//! computation uses Welford's updates, tracking non-zeros separately for
//! sparse input so that implicit zeros are folded in at the end. The two
//! agree up to floating-point error.

use super::apply::{direct, running, to_f64, use_direct, Slice};
use crate::base::{Element, Matrix};
use crate::config::StatsConfig;
use crate::error::Result;
use num_traits::ToPrimitive;

/// Sample mean and variance of `values` plus `nzero` implicit zeros.
///
/// The mean is NaN for no observations, the variance for fewer than two.
pub fn mean_and_variance(values: impl Iterator<Item = f64> + Clone, nzero: usize) -> (f64, f64) {
    let (sum, count) = values.clone().fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    let n = count + nzero;
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = sum / n as f64;
    let mut ss: f64 = values.map(|x| (x - mean) * (x - mean)).sum();
    ss += mean * mean * nzero as f64;
    let var = if n > 1 { ss / (n - 1) as f64 } else { f64::NAN };
    (mean, var)
}

/// Welford state for a block of targets.
struct Running {
    means: Vec<f64>,
    sumsq: Vec<f64>,
    /// Values folded into the mean so far; fewer than `seen` for sparse input.
    counts: Vec<usize>,
    /// Skipped NaNs.
    nans: Vec<usize>,
    seen: usize,
}

impl Running {
    fn new(n: usize) -> Self {
        Self {
            means: vec![0.0; n],
            sumsq: vec![0.0; n],
            counts: vec![0; n],
            nans: vec![0; n],
            seen: 0,
        }
    }

    #[inline]
    fn update(&mut self, k: usize, x: f64, skip_nan: bool) {
        if skip_nan && x.is_nan() {
            self.nans[k] += 1;
            return;
        }
        self.counts[k] += 1;
        let delta = x - self.means[k];
        self.means[k] += delta / self.counts[k] as f64;
        self.sumsq[k] += delta * (x - self.means[k]);
    }

    fn finish(self, out: &mut [f64]) {
        for (k, out) in out.iter_mut().enumerate() {
            let total = self.seen - self.nans[k];
            let observed = self.counts[k];
            let mut sumsq = self.sumsq[k];

            // Fold in the implicit zeros that were never visited.
            let nzero = total - observed;
            if observed > 0 && nzero > 0 {
                let mean = self.means[k];
                sumsq += mean * mean * (observed as f64 / total as f64) * nzero as f64;
            }
            *out = if total > 1 { sumsq / (total - 1) as f64 } else { f64::NAN };
        }
    }
}

fn variances<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, row: bool, config: &StatsConfig) -> Result<Vec<f64>> {
    let skip_nan = config.skip_nan;
    let otherdim = matrix.non_target_dim(row);

    if use_direct(matrix, row) {
        return direct(matrix, row, config.num_threads, |slice| {
            let (values, nzero) = match slice {
                Slice::Dense(v) => (v, 0),
                Slice::Sparse { values, .. } => (values, otherdim - values.len()),
            };
            let iter = values.iter().map(|&x| to_f64(x)).filter(|x| !(skip_nan && x.is_nan()));
            mean_and_variance(iter, nzero).1
        });
    }

    running(
        matrix,
        row,
        config.num_threads,
        Running::new,
        |state: &mut Running, slice| {
            state.seen += 1;
            match slice {
                Slice::Dense(v) => {
                    for (k, &x) in v.iter().enumerate() {
                        state.update(k, to_f64(x), skip_nan);
                    }
                }
                Slice::Sparse { values, indices } => {
                    for (&x, &j) in values.iter().zip(indices) {
                        state.update(j, to_f64(x), skip_nan);
                    }
                }
            }
        },
        |state, out| state.finish(out),
    )
}

/// Sample variance of each row.
pub fn row_variances<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    variances(matrix, true, config)
}

/// Sample variance of each column.
pub fn column_variances<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    variances(matrix, false, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::convert_to_compressed_sparse;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_mean_and_variance() {
        let (mean, var) = mean_and_variance([1.0, 2.0, 3.0, 4.0].into_iter(), 0);
        assert_relative_eq!(mean, 2.5);
        assert_relative_eq!(var, 5.0 / 3.0);

        // Same values with two of them implicit zeros.
        let (mean, var) = mean_and_variance([3.0, 5.0].into_iter(), 2);
        let (emean, evar) = mean_and_variance([0.0, 3.0, 0.0, 5.0].into_iter(), 0);
        assert_relative_eq!(mean, emean);
        assert_relative_eq!(var, evar, epsilon = 1e-12);

        assert!(mean_and_variance(std::iter::empty(), 0).0.is_nan());
        let (mean, var) = mean_and_variance([7.0].into_iter(), 0);
        assert_eq!(mean, 7.0);
        assert!(var.is_nan());
    }

    #[test]
    fn test_direct_and_running_agree() {
        let (nrow, ncol) = (20, 13);
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f64> = (0..nrow * ncol)
            .map(|_| if rng.gen_bool(0.3) { rng.gen_range(-10.0..10.0) } else { 0.0 })
            .collect();
        let by_row = DenseMatrix::row_major(nrow, ncol, values.clone()).unwrap();
        let by_col = convert_to_compressed_sparse(&by_row, false, 1).unwrap();
        let config = StatsConfig {
            num_threads: 3,
            ..StatsConfig::default()
        };

        let rows_direct = row_variances(&by_row, &config).unwrap();
        let rows_running = row_variances(&by_col, &config).unwrap();
        let cols_running = column_variances(&by_row, &config).unwrap();
        let cols_direct = column_variances(&by_col, &config).unwrap();

        for r in 0..nrow {
            let expected = mean_and_variance(values[r * ncol..(r + 1) * ncol].iter().copied(), 0).1;
            assert_relative_eq!(rows_direct[r], expected, epsilon = 1e-9);
            assert_relative_eq!(rows_running[r], expected, epsilon = 1e-9);
        }
        for c in 0..ncol {
            let expected = mean_and_variance((0..nrow).map(|r| values[r * ncol + c]), 0).1;
            assert_relative_eq!(cols_direct[c], expected, epsilon = 1e-9);
            assert_relative_eq!(cols_running[c], expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_skip_nan() {
        let mat = DenseMatrix::row_major(2, 3, vec![1.0, f64::NAN, 3.0, f64::NAN, 0.0, f64::NAN]).unwrap();
        let sparse = convert_to_compressed_sparse(&mat, false, 1).unwrap();
        let config = StatsConfig {
            skip_nan: true,
            ..StatsConfig::default()
        };
        for m in [&mat as &dyn Matrix<f64>, &sparse] {
            let vars = row_variances(m, &config).unwrap();
            assert_relative_eq!(vars[0], 2.0);
            assert!(vars[1].is_nan());
            assert!(row_variances(m, &StatsConfig::default()).unwrap()[0].is_nan());
        }
    }
}
