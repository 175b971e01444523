//! In-memory quote store.
//!
//! `QuoteBook` is the single source of truth for the running session. It owns
//! the ordered collection outright; callers go through the operations below
//! and never hold a reference to the underlying storage.

use log::debug;
use rand::Rng;

use super::constants::FILTER_ALL;
use super::model::{DedupPolicy, QuoteRecord};
use super::snapshot::SnapshotStore;
use crate::errors::SnapshotError;

/// How records loaded from a persisted snapshot are folded into the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotLoadMode {
    /// Each loaded record passes the same validation and dedup check as a
    /// manual add.
    Deduplicated,
    /// Loaded records are appended as-is, duplicates included. Mirrors the
    /// historical load path; the sync engine still enforces the dedup
    /// invariant on every merge afterwards.
    AppendUnchecked,
}

/// The records every fresh book starts with.
fn builtin_quotes() -> Vec<QuoteRecord> {
    vec![
        QuoteRecord::new("Success is not final.", "Motivation"),
        QuoteRecord::new("Code is poetry.", "Programming"),
    ]
}

/// Ordered, dedup-checked collection of quotes.
pub struct QuoteBook {
    records: Vec<QuoteRecord>,
    policy: DedupPolicy,
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}

impl QuoteBook {
    /// Create an empty book with the given dedup policy.
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            records: Vec::new(),
            policy,
        }
    }

    /// Create a book seeded with the built-in default records.
    pub fn with_defaults(policy: DedupPolicy) -> Self {
        let mut book = Self::new(policy);
        for record in builtin_quotes() {
            book.add(record);
        }
        book
    }

    /// The dedup policy this book was constructed with.
    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Append a record.
    ///
    /// Returns `true` when the record was appended. Invalid records (empty
    /// text or category after trimming) and records whose dedup key is
    /// already present are ignored without error.
    pub fn add(&mut self, record: QuoteRecord) -> bool {
        if !record.is_valid() {
            debug!("Rejected quote with empty text or category");
            return false;
        }
        if self.contains(&record) {
            debug!("Skipped duplicate quote: {}", self.policy.key(&record).as_str());
            return false;
        }
        self.records.push(record);
        true
    }

    /// All records, in insertion order.
    pub fn all(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Records matching a category selector, in insertion order.
    ///
    /// The `"all"` sentinel returns every record.
    pub fn by_category(&self, selector: &str) -> Vec<QuoteRecord> {
        if selector == FILTER_ALL {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|r| r.category == selector)
            .cloned()
            .collect()
    }

    /// Whether any record shares the given record's dedup key.
    pub fn contains(&self, record: &QuoteRecord) -> bool {
        let key = self.policy.key(record);
        self.records.iter().any(|r| self.policy.key(r) == key)
    }

    /// Fold records loaded from a persisted snapshot into the book.
    ///
    /// Returns the number of records appended.
    pub fn load_snapshot(&mut self, records: Vec<QuoteRecord>, mode: SnapshotLoadMode) -> usize {
        match mode {
            SnapshotLoadMode::Deduplicated => {
                let mut appended = 0;
                for record in records {
                    if self.add(record) {
                        appended += 1;
                    }
                }
                appended
            }
            SnapshotLoadMode::AppendUnchecked => {
                let appended = records.len();
                self.records.extend(records);
                appended
            }
        }
    }

    /// Number of records in the book.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the book holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pick one record uniformly at random from a subset.
///
/// Returns `None` for an empty subset; an empty filter result is a display
/// condition ("no quotes in this category"), not an error.
pub fn pick_random(subset: &[QuoteRecord]) -> Option<&QuoteRecord> {
    if subset.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..subset.len());
    subset.get(index)
}

/// Create the session book: built-in defaults plus the persisted snapshot.
pub fn bootstrap_book<S: SnapshotStore>(
    store: &S,
    policy: DedupPolicy,
    mode: SnapshotLoadMode,
) -> Result<QuoteBook, SnapshotError> {
    let mut book = QuoteBook::with_defaults(policy);
    let loaded = store.load()?;
    let appended = book.load_snapshot(loaded, mode);
    debug!("Loaded {} quotes from persisted snapshot", appended);
    Ok(book)
}
