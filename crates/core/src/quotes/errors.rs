//! Sync-related error types.

use thiserror::Error;

/// Errors that can occur during remote reconciliation.
///
/// This error type bridges the feed crate's transport errors and the
/// engine's own failure modes. Both variants are absorbed by the engine:
/// a failed fetch aborts the cycle, a failed push is logged and dropped.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote fetch failed (network, status, or parse).
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The best-effort push was rejected by the remote.
    #[error("Push failed: {0}")]
    PushFailed(String),
}
