//! Result store error types.

use thiserror::Error;

/// Errors raised while reading or writing result files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested file name is empty or escapes the results directory.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// Requested file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
