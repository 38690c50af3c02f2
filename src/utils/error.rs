//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and
//! commands. The registry core itself has no error path: its operations
//! are pure in-memory structural updates that cannot fail.

use thiserror::Error;

/// Errors that can occur while parsing textual stack traces
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no exception header found in input")]
    MissingHeader,
}

/// Errors that can occur while writing reports
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
