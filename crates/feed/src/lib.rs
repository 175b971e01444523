//! Quotefolio Feed - HTTP client for the remote quote feed.
//!
//! This crate provides the API client and wire types for pulling candidate
//! quote records from the feed service and pushing the local collection back.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quotefolio_feed::QuoteFeedClient;
//!
//! let client = QuoteFeedClient::new("https://feed.quotefolio.app");
//! let quotes = client.fetch_quotes().await?;
//! ```

mod client;
mod error;
mod types;

pub use client::QuoteFeedClient;
pub use error::{FeedError, Result};
pub use types::FeedQuote;
