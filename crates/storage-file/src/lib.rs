//! File-backed storage implementation for Quotefolio.
//!
//! Implements the core's `SnapshotStore` trait over two files in a data
//! directory: the quote snapshot as a JSON array, and the remembered
//! category filter as a plain string. Saves are wholesale overwrites,
//! written atomically (temp file + rename).

mod snapshot;

pub use snapshot::FileSnapshotStore;
