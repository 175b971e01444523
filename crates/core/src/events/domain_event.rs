//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::quotes::model::QuoteRecord;

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about quote data changes. Rendering surfaces
/// translate them into platform-specific actions (dropdown refresh, quote
/// display, notification banner); the core never assumes a particular
/// surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// New records were merged into the collection.
    QuotesChanged { added: usize },

    /// The derived category set was recomputed.
    CategoriesChanged { categories: Vec<String> },

    /// A quote was selected for display under the active filter.
    /// `record` is `None` when the filter matched nothing.
    QuoteDisplayed {
        record: Option<QuoteRecord>,
        category: String,
    },

    /// A reconciliation cycle merged remote changes; the message is the
    /// transient notification text.
    SyncCompleted { message: String },

    /// The transient sync notification timed out and was cleared.
    SyncNotificationCleared,
}

impl DomainEvent {
    /// Creates a QuotesChanged event.
    pub fn quotes_changed(added: usize) -> Self {
        Self::QuotesChanged { added }
    }

    /// Creates a CategoriesChanged event.
    pub fn categories_changed(categories: Vec<String>) -> Self {
        Self::CategoriesChanged { categories }
    }

    /// Creates a QuoteDisplayed event.
    pub fn quote_displayed(record: Option<QuoteRecord>, category: impl Into<String>) -> Self {
        Self::QuoteDisplayed {
            record,
            category: category.into(),
        }
    }
}
