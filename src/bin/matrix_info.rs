//! Summary of a Matrix Market file
//!
//! Usage: matrix_info <matrix.mtx> [--config stats_config.json]
//!
//! Prints the dimensions, storage kind and access preferences as JSON,
//! together with the overall range of values and the number of
//! structurally non-zero entries.

use clap::Parser;
use lazy_matrix::io::load_matrix_market;
use lazy_matrix::stats::{row_ranges, row_zero_counts};
use lazy_matrix::StatsConfig;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Dimensions, sparsity and value range of a Matrix Market file
#[derive(Parser)]
#[command(name = "matrix_info")]
#[command(about = "Dimensions, sparsity and value range of a Matrix Market file")]
struct Args {
    /// Matrix Market file to read
    matrix: PathBuf,

    /// JSON file with statistics settings (threads, NaN handling)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazy_matrix=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let matrix_path = args.matrix;
    let config = match &args.config {
        Some(path) => StatsConfig::load(path)?,
        None => StatsConfig {
            skip_nan: true,
            ..StatsConfig::default()
        },
    };

    let matrix = load_matrix_market(&matrix_path)?.into_shared();
    let ranges = row_ranges(matrix.as_ref(), &config)?;
    let zeros = row_zero_counts(matrix.as_ref(), &config)?;

    let (min, max) = ranges
        .iter()
        .filter(|(lo, hi)| !lo.is_nan() && !hi.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(a, b)| (lo.min(a), hi.max(b)));
    let total = matrix.nrow() * matrix.ncol();
    let nonzero = total - zeros.iter().sum::<usize>();
    let empty_rows = zeros.iter().filter(|&&z| z == matrix.ncol()).count();

    let summary = json!({
        "path": matrix_path.display().to_string(),
        "nrow": matrix.nrow(),
        "ncol": matrix.ncol(),
        "sparse": matrix.is_sparse(),
        "prefer_rows": matrix.prefer_rows(),
        "nonzero": nonzero,
        "density": if total > 0 { nonzero as f64 / total as f64 } else { 0.0 },
        "empty_rows": empty_rows,
        "min": if min.is_finite() { json!(min) } else { json!(null) },
        "max": if max.is_finite() { json!(max) } else { json!(null) },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["matrix_info", "counts.mtx"]).unwrap();
        assert_eq!(args.matrix, PathBuf::from("counts.mtx"));
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["matrix_info", "counts.mtx", "--config", "stats.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("stats.json")));

        assert!(Args::try_parse_from(["matrix_info"]).is_err());
    }
}
