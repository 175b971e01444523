//! Category index.
//!
//! Categories are derived from the quote collection and never stored as
//! independent truth; the set is recomputed whenever a caller needs it.
//! The remembered filter selection is persisted through the snapshot store.

use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::quotes::constants::FILTER_ALL;
use crate::quotes::model::QuoteRecord;
use crate::quotes::snapshot::SnapshotStore;

/// Distinct category values in first-occurrence order.
///
/// The order is stable with respect to the collection, not alphabetical:
/// a category appears where its first record does.
pub fn distinct_categories(records: &[QuoteRecord]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for record in records {
        if !categories.iter().any(|c| c == &record.category) {
            categories.push(record.category.clone());
        }
    }
    categories
}

/// Access to the remembered category filter.
pub struct CategoryService<S: SnapshotStore> {
    store: Arc<S>,
}

impl<S: SnapshotStore> CategoryService<S> {
    /// Create a new category service over the given snapshot store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The last selected filter, falling back to `"all"` when nothing was
    /// persisted.
    pub fn last_filter(&self) -> Result<String> {
        Ok(self
            .store
            .load_last_filter()?
            .unwrap_or_else(|| FILTER_ALL.to_string()))
    }

    /// Persist the selected filter.
    pub fn set_last_filter(&self, value: &str) -> Result<()> {
        debug!("Persisting category filter: {}", value);
        self.store.save_last_filter(value)?;
        Ok(())
    }

    /// Re-evaluate the persisted filter against the current category set.
    ///
    /// A filter that no longer names a known category falls back to `"all"`
    /// and is re-persisted.
    pub fn validated_filter(&self, categories: &[String]) -> Result<String> {
        let current = self.last_filter()?;
        if current == FILTER_ALL || categories.iter().any(|c| c == &current) {
            return Ok(current);
        }
        debug!(
            "Filter '{}' no longer matches a category, resetting to '{}'",
            current, FILTER_ALL
        );
        self.store.save_last_filter(FILTER_ALL)?;
        Ok(FILTER_ALL.to_string())
    }
}
