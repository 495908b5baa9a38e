//! Dense backends and dense materialization.

pub mod convert;
pub mod dense_matrix;
pub mod sparsified;
pub mod transpose;

pub use convert::{convert_to_dense, convert_to_dense_vec};
pub use dense_matrix::DenseMatrix;
pub use sparsified::SparsifiedWrapper;
pub use transpose::transpose;
