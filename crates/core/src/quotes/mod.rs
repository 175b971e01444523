//! Quote management module.
//!
//! This module provides the core types and services for the quote collection:
//!
//! - [`model`] - Domain models for quote records and the dedup policy
//! - [`store`] - The in-memory collection and session bootstrap
//! - [`snapshot`] - Persistence trait for the durable snapshot
//! - [`client`] - Remote feed facade and the remote source trait
//! - [`sync`] - The reconciliation engine and its notifier
//! - [`scheduler`] - Recurring sync trigger
//! - [`import`] - JSON import/export at the file-exchange boundary
//! - [`constants`] - Configuration constants
//!
//! # Architecture
//!
//! ```text
//! QuoteSyncService → RemoteQuoteSource → feed crate (HTTP)
//!       ↓
//! QuoteBook ──► SnapshotStore (storage-file crate)
//!       ↓
//! DomainEventSink (rendering surfaces)
//! ```
//!
//! 1. **Models** (`model.rs`) - Pure data structures, no infrastructure
//! 2. **Store** (`store.rs`) - The owned in-memory collection
//! 3. **Snapshot Trait** (`snapshot.rs`) - Abstract persistence boundary
//! 4. **Client** (`client.rs`) - Facade for the feed crate
//! 5. **Sync Service** (`sync.rs`) - Orchestrates the reconciliation cycle
//! 6. **Scheduler** (`scheduler.rs`) - Fires the recurring trigger
//!
//! This separation allows easy testing with mock implementations and
//! swapping the storage or transport backend without touching the engine.

pub mod client;
pub mod constants;
pub mod errors;
pub mod import;
pub mod model;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod sync;

#[cfg(test)]
mod sync_tests;

// Re-export commonly used types for convenience
pub use model::{DedupKey, DedupPolicy, QuoteRecord};
pub use snapshot::SnapshotStore;
pub use store::{bootstrap_book, pick_random, QuoteBook, SnapshotLoadMode};

// Re-export sync service types
pub use sync::{QuoteSyncService, SyncNotifier, SyncOutcome, SyncPhase, SyncStatus};

// Re-export scheduler entry points
pub use scheduler::{start_sync_scheduler, start_sync_scheduler_with_period};

// Re-export client types
pub use client::{QuoteFeedSource, RemoteQuoteSource};

// Re-export import types
pub use import::{export_json, import_json, ImportSummary};

// Re-export constants
pub use constants::*;

// Re-export error types
pub use errors::SyncError;
