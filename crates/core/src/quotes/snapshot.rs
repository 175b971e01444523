//! Snapshot persistence trait.
//!
//! This module defines the durable key-value boundary the core reads and
//! writes through. Implementations (e.g. the file-backed store) handle the
//! actual medium.
//!
//! # Design Notes
//!
//! - Saves are wholesale: the full collection overwrites the snapshot key,
//!   never an incremental patch.
//! - `load` returns an empty collection both when nothing is stored and when
//!   the stored payload cannot be parsed; a corrupt snapshot must degrade,
//!   not crash the process.
//! - Methods are synchronous: persistence is local and fast, and the sync
//!   engine must not suspend while holding the collection.

use crate::errors::SnapshotError;
use crate::quotes::model::QuoteRecord;

/// Storage interface for the quote snapshot and the remembered filter.
pub trait SnapshotStore: Send + Sync {
    /// Overwrite the persisted snapshot with the full collection.
    fn save(&self, records: &[QuoteRecord]) -> Result<(), SnapshotError>;

    /// Load the persisted snapshot.
    ///
    /// Returns an empty vector when nothing is stored or the payload is
    /// unparsable (the implementation logs the condition).
    fn load(&self) -> Result<Vec<QuoteRecord>, SnapshotError>;

    /// Persist the last selected category filter.
    fn save_last_filter(&self, value: &str) -> Result<(), SnapshotError>;

    /// Load the last selected category filter, if any was persisted.
    fn load_last_filter(&self) -> Result<Option<String>, SnapshotError>;
}
