//! Remote feed facade.
//!
//! Bridges the `quotefolio-feed` crate into the core's [`RemoteQuoteSource`]
//! boundary: caps the batch size, stamps the fixed remote category label,
//! and converts transport errors into sync errors.

use async_trait::async_trait;
use log::debug;

use quotefolio_feed::{FeedQuote, QuoteFeedClient};

use super::constants::{MAX_REMOTE_BATCH, REMOTE_CATEGORY};
use super::errors::SyncError;
use super::model::QuoteRecord;

/// The network boundary supplying candidate quote records.
#[async_trait]
pub trait RemoteQuoteSource: Send + Sync {
    /// Fetch an ordered batch of candidate records.
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, SyncError>;

    /// Send the full local collection to the remote, best-effort.
    async fn push(&self, records: &[QuoteRecord]) -> Result<(), SyncError>;
}

/// [`RemoteQuoteSource`] implementation backed by the feed HTTP client.
pub struct QuoteFeedSource {
    client: QuoteFeedClient,
    batch_limit: usize,
    remote_category: String,
}

impl QuoteFeedSource {
    /// Create a source with the default batch limit and category label.
    pub fn new(client: QuoteFeedClient) -> Self {
        Self {
            client,
            batch_limit: MAX_REMOTE_BATCH,
            remote_category: REMOTE_CATEGORY.to_string(),
        }
    }

    /// Override the maximum number of candidates taken from one fetch.
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }
}

#[async_trait]
impl RemoteQuoteSource for QuoteFeedSource {
    async fn fetch(&self) -> Result<Vec<QuoteRecord>, SyncError> {
        let fetched = self
            .client
            .fetch_quotes()
            .await
            .map_err(|e| SyncError::FetchFailed(e.to_string()))?;

        debug!("Fetched {} candidate quotes from feed", fetched.len());

        Ok(fetched
            .into_iter()
            .take(self.batch_limit)
            .map(|q| QuoteRecord::new(q.text, self.remote_category.clone()))
            .collect())
    }

    async fn push(&self, records: &[QuoteRecord]) -> Result<(), SyncError> {
        let payload: Vec<FeedQuote> = records
            .iter()
            .map(|r| FeedQuote {
                text: r.text.clone(),
                category: r.category.clone(),
            })
            .collect();

        self.client
            .push_quotes(&payload)
            .await
            .map_err(|e| SyncError::PushFailed(e.to_string()))
    }
}
