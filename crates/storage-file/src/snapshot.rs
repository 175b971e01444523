//! File-backed snapshot store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use quotefolio_core::errors::SnapshotError;
use quotefolio_core::quotes::{QuoteRecord, SnapshotStore};

/// File name of the persisted quote snapshot.
const SNAPSHOT_FILE: &str = "quotes.json";

/// File name of the persisted category filter.
const LAST_FILTER_FILE: &str = "last_filter";

/// `SnapshotStore` over a local data directory.
pub struct FileSnapshotStore {
    snapshot_path: PathBuf,
    filter_path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(io_err)?;
        Ok(Self {
            snapshot_path: data_dir.join(SNAPSHOT_FILE),
            filter_path: data_dir.join(LAST_FILTER_FILE),
        })
    }

    /// Write `contents` to `path` atomically: temp file in the same
    /// directory, then rename over the target.
    fn write_atomic(path: &Path, contents: &str) -> Result<(), SnapshotError> {
        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp_path, path).map_err(io_err)?;
        Ok(())
    }
}

fn io_err(err: std::io::Error) -> SnapshotError {
    SnapshotError::Io(err.to_string())
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, records: &[QuoteRecord]) -> Result<(), SnapshotError> {
        let payload = serde_json::to_string_pretty(records)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        Self::write_atomic(&self.snapshot_path, &payload)?;
        debug!(
            "Saved snapshot of {} quotes to {}",
            records.len(),
            self.snapshot_path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<QuoteRecord>, SnapshotError> {
        let payload = match fs::read_to_string(&self.snapshot_path) {
            Ok(payload) => payload,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        match serde_json::from_str(&payload) {
            Ok(records) => Ok(records),
            Err(e) => {
                // Corrupt snapshots degrade to an empty load
                warn!(
                    "Discarding unparsable snapshot at {}: {}",
                    self.snapshot_path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_last_filter(&self, value: &str) -> Result<(), SnapshotError> {
        Self::write_atomic(&self.filter_path, value)
    }

    fn load_last_filter(&self) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(&self.filter_path) {
            Ok(value) if !value.is_empty() => Ok(Some(value)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(e)),
        }
    }
}
