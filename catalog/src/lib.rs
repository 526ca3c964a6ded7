//! # Catalog
//!
//! The book corpus outside the vector index: record loading for ingestion,
//! an explicitly built title-to-summary map, and the `get_summary_by_title`
//! function tool a chat model calls once it has picked a book.

pub mod catalog;
pub mod error;
pub mod record;
pub mod tool;

pub use catalog::{SummaryCatalog, normalize_title};
pub use error::{CatalogError, Result};
pub use record::{BookRecord, load_records, record_id};
pub use tool::{FunctionTool, GET_SUMMARY_BY_TITLE, SummaryTool, ToolParameter};
