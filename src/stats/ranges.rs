//! Row and column minima and maxima.

use super::apply::{direct, running, to_f64, use_direct, Slice};
use crate::base::{Element, Matrix};
use crate::config::StatsConfig;
use crate::error::Result;
use num_traits::ToPrimitive;

/// Running minimum and maximum of one vector.
#[derive(Debug, Clone, Copy)]
struct Extremes {
    min: f64,
    max: f64,
    observed: usize,
    nan: bool,
}

impl Default for Extremes {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            observed: 0,
            nan: false,
        }
    }
}

impl Extremes {
    #[inline]
    fn add(&mut self, x: f64, skip_nan: bool) {
        if x.is_nan() {
            if !skip_nan {
                self.nan = true;
            }
            return;
        }
        self.observed += 1;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// `(min, max)` after accounting for `nzero` implicit zeros.
    fn finish(mut self, nzero: usize) -> (f64, f64) {
        if nzero > 0 {
            self.add(0.0, false);
        }
        if self.nan || self.observed == 0 {
            (f64::NAN, f64::NAN)
        } else {
            (self.min, self.max)
        }
    }
}

/// `(min, max)` of each row (`row = true`) or column.
fn ranges<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    row: bool,
    config: &StatsConfig,
) -> Result<Vec<(f64, f64)>> {
    let skip_nan = config.skip_nan;
    let otherdim = matrix.non_target_dim(row);

    if use_direct(matrix, row) {
        return direct(matrix, row, config.num_threads, |slice| {
            let mut state = Extremes::default();
            let (values, nzero) = match slice {
                Slice::Dense(v) => (v, 0),
                Slice::Sparse { values, .. } => (values, otherdim - values.len()),
            };
            for &x in values {
                state.add(to_f64(x), skip_nan);
            }
            state.finish(nzero)
        });
    }

    running(
        matrix,
        row,
        config.num_threads,
        |n| (vec![Extremes::default(); n], vec![0usize; n], 0usize),
        |(states, counts, seen): &mut (Vec<Extremes>, Vec<usize>, usize), slice| {
            *seen += 1;
            match slice {
                Slice::Dense(v) => {
                    for ((state, count), &x) in states.iter_mut().zip(counts.iter_mut()).zip(v) {
                        state.add(to_f64(x), skip_nan);
                        *count += 1;
                    }
                }
                Slice::Sparse { values, indices } => {
                    for (&x, &j) in values.iter().zip(indices) {
                        states[j].add(to_f64(x), skip_nan);
                        counts[j] += 1;
                    }
                }
            }
        },
        |(states, counts, seen), out| {
            for ((o, state), count) in out.iter_mut().zip(states).zip(counts) {
                *o = state.finish(seen - count);
            }
        },
    )
}

/// `(min, max)` of each row. Empty rows give NaN.
pub fn row_ranges<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<(f64, f64)>> {
    ranges(matrix, true, config)
}

/// `(min, max)` of each column. Empty columns give NaN.
pub fn column_ranges<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    config: &StatsConfig,
) -> Result<Vec<(f64, f64)>> {
    ranges(matrix, false, config)
}

pub fn row_mins<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    Ok(row_ranges(matrix, config)?.into_iter().map(|r| r.0).collect())
}

pub fn row_maxs<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    Ok(row_ranges(matrix, config)?.into_iter().map(|r| r.1).collect())
}

pub fn column_mins<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    Ok(column_ranges(matrix, config)?.into_iter().map(|r| r.0).collect())
}

pub fn column_maxs<T: Element + ToPrimitive>(matrix: &dyn Matrix<T>, config: &StatsConfig) -> Result<Vec<f64>> {
    Ok(column_ranges(matrix, config)?.into_iter().map(|r| r.1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::convert_to_compressed_sparse;

    #[test]
    fn test_ranges() {
        let dense = DenseMatrix::row_major(
            3,
            3,
            vec![
                1.0, 2.0, 3.0, //
                0.0, 5.0, 0.0, //
                -4.0, 0.0, f64::NAN,
            ],
        )
        .unwrap();
        let sparse = convert_to_compressed_sparse(&dense, false, 1).unwrap();

        for mat in [&dense as &dyn Matrix<f64>, &sparse] {
            let ranges = row_ranges(mat, &StatsConfig::default()).unwrap();
            assert_eq!(&ranges[..2], &[(1.0, 3.0), (0.0, 5.0)]);
            assert!(ranges[2].0.is_nan());

            let config = StatsConfig {
                skip_nan: true,
                num_threads: 2,
            };
            assert_eq!(row_mins(mat, &config).unwrap(), vec![1.0, 0.0, -4.0]);
            assert_eq!(row_maxs(mat, &config).unwrap(), vec![3.0, 5.0, 0.0]);
            assert_eq!(column_mins(mat, &config).unwrap(), vec![-4.0, 0.0, 0.0]);
            assert_eq!(column_maxs(mat, &config).unwrap(), vec![1.0, 5.0, 3.0]);
        }
    }

    #[test]
    fn test_all_nan_and_empty() {
        let mat = DenseMatrix::column_major(2, 1, vec![f64::NAN, f64::NAN]).unwrap();
        let config = StatsConfig {
            skip_nan: true,
            ..StatsConfig::default()
        };
        let ranges = column_ranges(&mat, &config).unwrap();
        assert!(ranges[0].0.is_nan() && ranges[0].1.is_nan());

        let empty = DenseMatrix::column_major(0, 3, Vec::<f64>::new()).unwrap();
        let maxs = column_maxs(&empty, &StatsConfig::default()).unwrap();
        assert_eq!(maxs.len(), 3);
        assert!(maxs.iter().all(|x| x.is_nan()));
    }
}
