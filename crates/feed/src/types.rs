//! Wire types for the remote quote feed.

use serde::{Deserialize, Serialize};

/// A quote record as carried on the feed wire.
///
/// The feed is schema-light: the quote text and the category label the
/// service filed it under. Local concerns (category stamping, batch capping,
/// dedup) belong to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuote {
    pub text: String,
    pub category: String,
}

/// Error payload returned by the feed service on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}
