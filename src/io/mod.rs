//! Reading and writing matrices from files.

pub mod matrix_market;

pub use matrix_market::{load_matrix_market, read_matrix_market, write_matrix_market, LoadedMatrix};
