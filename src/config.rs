//! Configuration for statistics and chunked backends
//!
//! Statistics settings can be loaded from a JSON file; missing fields take
//! their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings shared by all row/column statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Number of worker threads.
    pub num_threads: usize,
    /// Ignore NaN values instead of propagating them.
    pub skip_nan: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            num_threads: 1,
            skip_nan: false,
        }
    }
}

impl StatsConfig {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats config: {:?}", path))?;

        let config: StatsConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse stats config JSON: {:?}", path))?;

        if config.num_threads == 0 {
            anyhow::bail!("num_threads should be positive in {:?}", path);
        }

        Ok(config)
    }
}

/// Cache settings for chunked matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkedOptions {
    /// Upper bound on the memory used by cached slabs, in bytes.
    pub maximum_cache_size: usize,
    /// Cache at least one slab even if it exceeds `maximum_cache_size`.
    pub require_minimum_cache: bool,
}

impl Default for ChunkedOptions {
    fn default() -> Self {
        Self {
            maximum_cache_size: 100_000_000,
            require_minimum_cache: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config: StatsConfig = serde_json::from_str(r#"{"skip_nan": true}"#).unwrap();
        assert_eq!(config.num_threads, 1);
        assert!(config.skip_nan);

        let options: ChunkedOptions = serde_json::from_str(r#"{"maximum_cache_size": 0}"#).unwrap();
        assert_eq!(options.maximum_cache_size, 0);
        assert!(options.require_minimum_cache);
    }

    #[test]
    fn test_load() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("lazy_matrix_stats_{}.json", std::process::id()));
        fs::write(&path, r#"{"num_threads": 4}"#).unwrap();
        let config = StatsConfig::load(&path).unwrap();
        assert_eq!(config.num_threads, 4);
        assert!(!config.skip_nan);

        fs::write(&path, r#"{"num_threads": 0}"#).unwrap();
        assert!(StatsConfig::load(&path).is_err());
        fs::remove_file(&path).unwrap();

        assert!(StatsConfig::load(&dir.join("lazy_matrix_missing.json")).is_err());
    }
}
