//! Row and column statistics
//!
//! - Sums: totals, optionally skipping NaN
//! - Variances: sample variances, two-pass or Welford
//! - Medians: sparse-aware medians
//! - Ranges: minima and maxima
//! - Counts: NaN, zero or arbitrary predicates
//! - Grouped: sums and medians within groups of the other dimension
//!
//! Each statistic picks between iterating along the target dimension and
//! accumulating along the other one, depending on the matrix's preferred
//! access pattern, and splits the work across `StatsConfig::num_threads`.

mod apply;
pub mod counts;
pub mod grouped;
pub mod medians;
pub mod ranges;
pub mod sums;
pub mod variances;

pub use counts::{
    column_counts, column_nan_counts, column_zero_counts, row_counts, row_nan_counts, row_zero_counts,
};
pub use grouped::{column_medians_by_group, column_sums_by_group, row_medians_by_group, row_sums_by_group};
pub use medians::{column_medians, median_with_zeros, row_medians};
pub use ranges::{column_maxs, column_mins, column_ranges, row_maxs, row_mins, row_ranges};
pub use sums::{column_sums, row_sums};
pub use variances::{column_variances, mean_and_variance, row_variances};
