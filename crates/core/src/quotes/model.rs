//! Quote domain models.
//!
//! This module contains the core record type plus the dedup policy used to
//! decide whether two records are "the same" during insertion and merge.

use serde::{Deserialize, Serialize};

// =============================================================================
// Quote Record
// =============================================================================

/// A single quote: the text itself and the category it is filed under.
///
/// This is the unit of storage, persistence, and reconciliation. Records are
/// value objects and carry no identity beyond their dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub text: String,
    pub category: String,
}

impl QuoteRecord {
    /// Create a record from raw input, trimming surrounding whitespace.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            category: category.into().trim().to_string(),
        }
    }

    /// A record is valid for insertion when both fields are non-empty after
    /// trimming. Deserialized records may carry untrimmed fields, so the
    /// check trims again rather than trusting the constructor.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

// =============================================================================
// Dedup Policy
// =============================================================================

/// Opaque key deciding whether two records are the same during merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    /// The key as a displayable string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Equality policy applied when checking whether a record already exists.
///
/// `TextOnly` treats the trimmed text alone as identifying; `TextAndCategory`
/// also distinguishes records by category. The policy is fixed at store
/// construction so every insertion and merge derives keys the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DedupPolicy {
    /// Two records are the same when their trimmed text matches.
    #[default]
    TextOnly,
    /// Two records are the same when both text and category match.
    TextAndCategory,
}

impl DedupPolicy {
    /// Compute the dedup key for a record under this policy.
    pub fn key(&self, record: &QuoteRecord) -> DedupKey {
        match self {
            DedupPolicy::TextOnly => DedupKey(record.text.trim().to_string()),
            // 0x1F cannot appear in quote text, so the composite never
            // collides with a plain text key.
            DedupPolicy::TextAndCategory => DedupKey(format!(
                "{}\u{1f}{}",
                record.text.trim(),
                record.category.trim()
            )),
        }
    }
}
