//! Column statistics for a Matrix Market file
//!
//! Usage: colsums <matrix.mtx> [--config stats_config.json]
//!
//! Prints one line per column: index, sum, mean and sample variance.

use clap::Parser;
use lazy_matrix::io::load_matrix_market;
use lazy_matrix::stats::{column_sums, column_variances};
use lazy_matrix::StatsConfig;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Per-column sums, means and variances of a Matrix Market file
#[derive(Parser)]
#[command(name = "colsums")]
#[command(about = "Per-column sums, means and variances of a Matrix Market file")]
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
        None => StatsConfig::default(),
    };
    tracing::info!("Stats config: {:?}", config);

    let start = Instant::now();
    let matrix = load_matrix_market(&matrix_path)?.into_shared();
    tracing::info!(
        "Loaded {} x {} matrix in {:.3}s",
        matrix.nrow(),
        matrix.ncol(),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let sums = column_sums(matrix.as_ref(), &config)?;
    let variances = column_variances(matrix.as_ref(), &config)?;
    tracing::info!("Computed column statistics in {:.3}s", start.elapsed().as_secs_f64());

    let nrow = matrix.nrow() as f64;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "column\tsum\tmean\tvariance")?;
    for (c, (sum, var)) in sums.iter().zip(&variances).enumerate() {
        let mean = if nrow > 0.0 { sum / nrow } else { f64::NAN };
        writeln!(out, "{}\t{}\t{}\t{}", c + 1, sum, mean, var)?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["colsums", "counts.mtx"]).unwrap();
        assert_eq!(args.matrix, PathBuf::from("counts.mtx"));
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["colsums", "counts.mtx", "--config", "stats.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("stats.json")));

        assert!(Args::try_parse_from(["colsums"]).is_err());
    }
}
