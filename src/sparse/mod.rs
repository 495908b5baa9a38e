//! Sparse backends
//!
//! - Compressed: CSR/CSC storage with shared pointer array
//! - Fragmented: separate vectors per row/column
//! - Triplets: sorting (row, column, value) triplets into compressed order
//! - Convert: materializing any matrix into sparse storage

pub mod compressed;
pub mod convert;
mod extraction;
pub mod fragmented;
pub mod triplets;

pub use compressed::CompressedSparseMatrix;
pub use convert::{convert_to_compressed_sparse, convert_to_fragmented_sparse};
pub use fragmented::FragmentedSparseMatrix;
pub use triplets::compress_sparse_triplets;
