//! Utility modules shared across backends and statistics
//!
//! - Parallelize: splitting loops over rows/columns across rayon workers
//! - Consecutive: oracular extraction over contiguous runs

pub mod consecutive;
pub mod parallelize;

// Re-export commonly used helpers
pub use consecutive::{consecutive_dense, consecutive_sparse, process_consecutive_indices};
pub use parallelize::{parallelize, parallelize_blocks, parallelize_into, parallelize_map, split_tasks};
