//! Error types for the network library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Sizes or learning rate rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input or target vector of the wrong length
    #[error("Dimension mismatch: {what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what : &'static str,
        expected : usize,
        actual : usize,
    },

    /// Persisted matrix does not fit the network it is loaded into
    #[error("Shape mismatch in {what}: found {found:?}, expected {expected:?}")]
    ShapeMismatch {
        what : &'static str,
        expected : (usize, usize),
        found : (usize, usize),
    },

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("Dataset is empty")]
    EmptyDataset,

    /// Malformed dataset line
    #[error("Parse error on line {line}: {message}")]
    Parse { line : usize, message : String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted blob could not be encoded or decoded
    #[cfg(feature = "save")]
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Not a model file, or written by an incompatible version
    #[error("Unsupported model format: {0}")]
    Format(String),

    /// A thread panicked while holding the network lock
    #[error("Network lock poisoned")]
    Poisoned,
}

impl Error {

    pub(crate) fn dimension(what : &'static str, expected : usize, actual : usize) -> Self {
        Error::DimensionMismatch { what, expected, actual }
    }

}
