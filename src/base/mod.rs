//! Core matrix interface: the `Matrix` trait, extractors, selections and oracles.

pub mod extractor;
pub mod matrix;
pub mod oracle;
pub mod selection;

pub use extractor::{
    DenseExtractor, OracularDenseExtractor, OracularSparseExtractor, PseudoOracularDense,
    PseudoOracularSparse, SparseExtractor, SparseRange, take_prefix,
};
pub use matrix::{is_zero, Element, Matrix, SharedMatrix};
pub use oracle::{ConsecutiveOracle, FixedOracle, Oracle};
pub use selection::{Options, Selection, SelectionIter};
