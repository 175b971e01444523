//! Core error types for Quotefolio.
//!
//! This module defines storage-agnostic error types. Medium-specific errors
//! (file I/O, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use crate::quotes::errors::SyncError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quote application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot operation failed: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Sync operation failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for snapshot persistence.
///
/// The storage layer converts medium-specific errors into this format so
/// the core stays agnostic of the durable medium.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The durable medium could not be read or written.
    #[error("Snapshot I/O failed: {0}")]
    Io(String),

    /// The collection could not be serialized for writing.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
