//! Typed search results.

use serde::Serialize;
use shelfwise_vector_store::IndexQueryResult;

use crate::error::{Result, RetrievalError};

/// Unfiltered index output kept for diagnostics.
pub type RawResults = IndexQueryResult;

/// A retrieved book annotated with its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    id: String,
    title: String,
    summary: String,
    distance: f32,
}

impl Hit {
    /// Create a hit. The distance must be finite and non-negative.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        distance: f32,
    ) -> Result<Self> {
        let id = id.into();
        if !distance.is_finite() || distance < 0.0 {
            return Err(RetrievalError::InvalidDistance { id, distance });
        }
        Ok(Self {
            id,
            title: title.into(),
            summary: summary.into(),
            distance,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Cosine distance to the query; lower is closer.
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Outcome of one search.
///
/// `hits` is sorted by non-decreasing distance, holds at most `k` entries,
/// and may be empty when nothing cleared the relevance bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,

    /// Resolved neighbor count.
    pub k: usize,

    pub hits: Vec<Hit>,

    /// Every candidate the index returned, before filtering.
    pub raw: RawResults,
}

impl SearchResult {
    /// Closest hit, if any.
    pub fn best(&self) -> Option<&Hit> {
        self.hits.first()
    }
}
