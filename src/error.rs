//! Error types for the axle-eval library.

use thiserror::Error;

/// Result type for axle-eval operations.
pub type Result<T> = std::result::Result<T, AxleEvalError>;

/// Error types that can occur while grouping or evaluating annotations.
#[derive(Error, Debug)]
pub enum AxleEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required field in the annotation document.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A region does not have the expected shape.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Invalid confidence threshold or threshold count.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid configuration value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
