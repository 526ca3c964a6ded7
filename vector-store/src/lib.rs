//! # Vector Store
//!
//! Persistent nearest-neighbor collections over embedding vectors.
//!
//! A [`Collection`] holds `(id, vector, document, metadata)` rows and answers
//! cosine-distance queries with index-aligned columns sorted ascending by
//! distance. Each collection records the embedding model it was built with
//! so that readers can refuse vectors from a different model.
//!
//! [`VectorStore`] maps collection names to JSON files under a root
//! directory. Consumers that only need to query depend on the
//! [`VectorIndex`] trait.

pub mod collection;
pub mod error;
pub mod result;
pub mod store;

use async_trait::async_trait;

pub use collection::{
    Collection, DistanceSpace, IndexBuildInfo, IndexEntry, Metadata, TITLE_KEY,
};
pub use error::{Result, VectorStoreError};
pub use result::IndexQueryResult;
pub use store::VectorStore;

/// Read-only nearest-neighbor capability.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// How the index was built.
    fn build_info(&self) -> &IndexBuildInfo;

    /// Up to `n_results` nearest rows, ascending by distance.
    async fn query(&self, vector: &[f32], n_results: usize) -> Result<IndexQueryResult>;

    /// Number of stored rows.
    async fn count(&self) -> Result<usize>;
}

#[async_trait]
impl VectorIndex for Collection {
    fn build_info(&self) -> &IndexBuildInfo {
        Collection::build_info(self)
    }

    async fn query(&self, vector: &[f32], n_results: usize) -> Result<IndexQueryResult> {
        Collection::query(self, vector, n_results)
    }

    async fn count(&self) -> Result<usize> {
        Ok(Collection::count(self))
    }
}
