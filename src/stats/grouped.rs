//! Per-group sums and medians.
//!
//! `groups` assigns each column (for row statistics) or each row (for
//! column statistics) to a group in `0..ngroups`, where `ngroups` is one
//! more than the largest group. Outputs are indexed as `[group][target]`.

use super::apply::{direct, running, to_f64, use_direct, Slice};
use super::medians::median_with_zeros;
use crate::base::{Element, Matrix};
use crate::config::StatsConfig;
use crate::error::{MatrixError, Result};
use num_traits::ToPrimitive;

/// Number of groups, after checking the factor against the matrix.
fn check_groups<T: Element>(matrix: &dyn Matrix<T>, row: bool, groups: &[usize]) -> Result<usize> {
    let otherdim = matrix.non_target_dim(row);
    if groups.len() != otherdim {
        return Err(MatrixError::DimensionMismatch(format!(
            "grouping factor has length {} but the matrix has {} {}",
            groups.len(),
            otherdim,
            if row { "columns" } else { "rows" }
        )));
    }
    match groups.iter().max() {
        None => Ok(0),
        Some(&g) => g
            .checked_add(1)
            .ok_or_else(|| MatrixError::InvalidArgument(format!("group {} is too large", g))),
    }
}

/// Turn per-target group vectors into per-group target vectors.
fn by_group(per_target: Vec<Vec<f64>>, ngroups: usize) -> Vec<Vec<f64>> {
    let mut output = vec![Vec::with_capacity(per_target.len()); ngroups];
    for target in per_target {
        for (g, x) in target.into_iter().enumerate() {
            output[g].push(x);
        }
    }
    output
}

fn grouped_sums<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    row: bool,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    let ngroups = check_groups(matrix, row, groups)?;
    let skip_nan = config.skip_nan;
    let keep = |x: f64| !(skip_nan && x.is_nan());

    let per_target = if use_direct(matrix, row) {
        direct(matrix, row, config.num_threads, |slice| {
            let mut totals = vec![0.0; ngroups];
            match slice {
                Slice::Dense(v) => {
                    for (&x, &g) in v.iter().zip(groups) {
                        let x = to_f64(x);
                        if keep(x) {
                            totals[g] += x;
                        }
                    }
                }
                Slice::Sparse { values, indices } => {
                    for (&x, &j) in values.iter().zip(indices) {
                        let x = to_f64(x);
                        if keep(x) {
                            totals[groups[j]] += x;
                        }
                    }
                }
            }
            totals
        })?
    } else {
        running(
            matrix,
            row,
            config.num_threads,
            |n| (vec![vec![0.0; ngroups]; n], 0usize),
            |(totals, position): &mut (Vec<Vec<f64>>, usize), slice| {
                let g = groups[*position];
                *position += 1;
                match slice {
                    Slice::Dense(v) => {
                        for (total, &x) in totals.iter_mut().zip(v) {
                            let x = to_f64(x);
                            if keep(x) {
                                total[g] += x;
                            }
                        }
                    }
                    Slice::Sparse { values, indices } => {
                        for (&x, &k) in values.iter().zip(indices) {
                            let x = to_f64(x);
                            if keep(x) {
                                totals[k][g] += x;
                            }
                        }
                    }
                }
            },
            |(totals, _), out| {
                for (o, t) in out.iter_mut().zip(totals) {
                    *o = t;
                }
            },
        )?
    };

    Ok(by_group(per_target, ngroups))
}

fn grouped_medians<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    row: bool,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    let ngroups = check_groups(matrix, row, groups)?;
    let mut sizes = vec![0usize; ngroups];
    for &g in groups {
        sizes[g] += 1;
    }
    let skip_nan = config.skip_nan;

    let per_target = direct(matrix, row, config.num_threads, |slice| {
        let mut work: Vec<Vec<f64>> = vec![Vec::new(); ngroups];
        let mut present = vec![0usize; ngroups];
        let mut push = |g: usize, x: f64| {
            present[g] += 1;
            if !(skip_nan && x.is_nan()) {
                work[g].push(x);
            }
        };
        match slice {
            Slice::Dense(v) => v.iter().zip(groups).for_each(|(&x, &g)| push(g, to_f64(x))),
            Slice::Sparse { values, indices } => values
                .iter()
                .zip(indices)
                .for_each(|(&x, &j)| push(groups[j], to_f64(x))),
        }
        work.iter_mut()
            .zip(&present)
            .zip(&sizes)
            .map(|((values, &n), &size)| median_with_zeros(values, size - n))
            .collect::<Vec<f64>>()
    })?;

    Ok(by_group(per_target, ngroups))
}

/// Sum of each row within each group of columns.
pub fn row_sums_by_group<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    grouped_sums(matrix, true, groups, config)
}

/// Sum of each column within each group of rows.
pub fn column_sums_by_group<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    grouped_sums(matrix, false, groups, config)
}

/// Median of each row within each group of columns.
pub fn row_medians_by_group<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    grouped_medians(matrix, true, groups, config)
}

/// Median of each column within each group of rows.
pub fn column_medians_by_group<T: Element + ToPrimitive>(
    matrix: &dyn Matrix<T>,
    groups: &[usize],
    config: &StatsConfig,
) -> Result<Vec<Vec<f64>>> {
    grouped_medians(matrix, false, groups, config)
}
