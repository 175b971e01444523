//! HTTP client for the remote quote feed service.

use log::debug;
use std::time::Duration;

use crate::error::{FeedError, Result};
use crate::types::{ApiErrorResponse, FeedQuote};

/// Default timeout for feed requests.
///
/// A fetch left hanging would keep the caller's sync cycle suspended, so
/// every request is bounded.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the remote quote feed API.
#[derive(Debug, Clone)]
pub struct QuoteFeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl QuoteFeedClient {
    /// Create a new feed client with the default request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the feed service (e.g., "https://feed.quotefolio.app")
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a feed client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Feed response ({}): {} bytes", status, body.len());

        if !status.is_success() {
            // Try to parse a structured error response first
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(FeedError::api(
                    status.as_u16(),
                    format!("{}: {}", error.code, error.message),
                ));
            }
            return Err(FeedError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| FeedError::Parse(e.to_string()))
    }

    /// Fetch the current batch of candidate quotes.
    ///
    /// GET /quotes
    pub async fn fetch_quotes(&self) -> Result<Vec<FeedQuote>> {
        let url = format!("{}/quotes", self.base_url);
        debug!("Fetching quotes from {}", url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Push the full local collection to the feed service.
    ///
    /// The feed acknowledges with a 2xx status; no response body contract.
    ///
    /// POST /quotes
    pub async fn push_quotes(&self, quotes: &[FeedQuote]) -> Result<()> {
        let url = format!("{}/quotes", self.base_url);
        debug!("Pushing {} quotes to {}", quotes.len(), url);

        let response = self.client.post(&url).json(&quotes).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::api(status.as_u16(), body));
        }
        Ok(())
    }
}
