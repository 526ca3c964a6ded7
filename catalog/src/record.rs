//! Book records as ingested into the index.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shelfwise_vector_store::{Metadata, TITLE_KEY};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// A book title with its canonical summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub summary: String,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Index metadata for this record.
    pub fn metadata(&self) -> Metadata {
        Metadata::from([(TITLE_KEY.to_string(), self.title.clone())])
    }
}

/// Stable index id for the record at `position`: `book-000`, `book-001`, ...
pub fn record_id(position: usize) -> String {
    format!("book-{position:03}")
}

/// Read a JSON array of records.
///
/// Titles and summaries are trimmed; records left with an empty title or
/// summary are skipped. A file with no usable records is an error.
pub async fn load_records(path: &Path) -> Result<Vec<BookRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let raw: Vec<BookRecord> =
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let total = raw.len();
    let records: Vec<BookRecord> = raw
        .into_iter()
        .map(|r| BookRecord::new(r.title.trim(), r.summary.trim()))
        .filter(|r| !r.title.is_empty() && !r.summary.is_empty())
        .collect();

    if records.len() < total {
        debug!("Skipped {} blank records", total - records.len());
    }
    if records.is_empty() {
        return Err(CatalogError::NoRecords(path.to_path_buf()));
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
