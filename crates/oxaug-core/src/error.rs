//! Error types for oxaug

use thiserror::Error;

/// Result type for oxaug operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxaug operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Operation requires a different number of channels
    #[error("{operation} expects {expected} channels, got {actual}")]
    ChannelMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Element type is neither quantized nor continuous
    #[error("Unsupported element type: {0}")]
    UnsupportedDType(String),

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Invalid buffer shape
    #[error("Invalid shape: {0}")]
    Shape(String),

    /// Transform parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Named target missing from a sample
    #[error("Missing target: {0}")]
    MissingTarget(String),

    /// Pipeline configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
