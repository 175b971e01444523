//! Error types for the feed crate.

use thiserror::Error;

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while talking to the remote quote feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP transport error (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status returned by the feed service
    #[error("Feed error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FeedError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
