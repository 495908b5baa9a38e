//! Lazy Matrix Library
//!
//! Read-only numeric matrices behind a single `Matrix` trait, with delayed
//! operations that transform rows and columns as they are extracted.
//!
//! - `base/`: the `Matrix` trait, extractors, selections and oracles
//! - `dense/`, `sparse/`, `constant`, `chunked/`: concrete backends
//! - `delayed/`: cast, transpose, bind and subset wrappers
//! - `isometric/`: element-wise unary and binary operations
//! - `io/`: Matrix Market reading and writing
//! - `stats/`: per-row and per-column statistics
//! - `utils/`: parallelization and consecutive-access helpers

pub mod base;
pub mod chunked;
pub mod config;
pub mod constant;
pub mod delayed;
pub mod dense;
pub mod error;
pub mod io;
pub mod isometric;
pub mod sparse;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use base::{
    DenseExtractor, Element, Matrix, Options, Selection, SharedMatrix, SparseExtractor, SparseRange,
};
pub use chunked::{ChunkedDenseMatrix, DenseChunk};
pub use config::{ChunkedOptions, StatsConfig};
pub use constant::ConstantMatrix;
pub use delayed::{
    make_delayed_bind, make_delayed_subset, make_delayed_subset_block, DelayedBind, DelayedCast,
    DelayedSubset, DelayedSubsetBlock, DelayedTranspose,
};
pub use dense::{convert_to_dense, DenseMatrix};
pub use error::{MatrixError, Result};
pub use isometric::{make_delayed_binary, make_delayed_unary, DelayedBinaryIsometric, DelayedUnaryIsometric};
pub use sparse::{
    compress_sparse_triplets, convert_to_compressed_sparse, convert_to_fragmented_sparse,
    CompressedSparseMatrix, FragmentedSparseMatrix,
};
