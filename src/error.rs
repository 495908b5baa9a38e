//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised when constructing or loading matrices.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid sparse storage: {0}")]
    InvalidSparse(String),

    #[error("index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MatrixError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MatrixError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;
