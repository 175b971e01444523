//! Quote import and export.
//!
//! The exchange format is the same JSON array used for the persisted
//! snapshot. Import feeds records through [`QuoteBook::add`] one at a time,
//! so field validation and dedup hold at this boundary too.

use log::info;
use serde::{Deserialize, Serialize};

use super::model::QuoteRecord;
use super::store::QuoteBook;
use crate::errors::Result;

/// Outcome of an import: how many records landed, how many were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Serialize the full collection as pretty-printed JSON.
pub fn export_json(book: &QuoteBook) -> Result<String> {
    Ok(serde_json::to_string_pretty(book.all())?)
}

/// Parse a JSON array of records and add each to the book.
///
/// Records failing validation or colliding on the dedup key are counted as
/// skipped, not errors; a payload that is not a JSON array of records is.
pub fn import_json(book: &mut QuoteBook, payload: &str) -> Result<ImportSummary> {
    let records: Vec<QuoteRecord> = serde_json::from_str(payload)?;

    let mut summary = ImportSummary {
        imported: 0,
        skipped: 0,
    };
    for record in records {
        if book.add(record) {
            summary.imported += 1;
        } else {
            summary.skipped += 1;
        }
    }

    info!(
        "Imported {} quotes ({} skipped)",
        summary.imported, summary.skipped
    );
    Ok(summary)
}
