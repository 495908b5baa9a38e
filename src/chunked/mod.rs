//! Chunked storage
//!
//! - LRU: fixed-size least-recently-used cache of chunks or slabs
//! - Oracle: slab cache that reads ahead in an oracle's predictions
//! - Dense: a dense matrix split into a grid of dense chunks

pub mod dense;
pub mod lru;
pub mod oracle;

pub use dense::{ChunkedDenseMatrix, DenseChunk};
pub use lru::LruChunkCache;
pub use oracle::OracleSlabCache;
