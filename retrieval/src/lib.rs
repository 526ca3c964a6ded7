//! # Retrieval
//!
//! Turns a reading-interest query into a short, ranked list of books.
//!
//! ```text
//! query ──► EmbeddingClient ──► VectorIndex ──► filter ──► SearchResult
//!               (retries)       (k nearest)    (adaptive
//!                                               ceiling)
//! ```
//!
//! The relevance filter adapts its distance ceiling to query length and
//! returns nothing rather than a handful of weak matches. Before embedding,
//! the [`Retriever`] checks that the index was built with the same model it
//! queries with.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelfwise_retrieval::{RetrievalConfig, Retriever};
//!
//! let config = RetrievalConfig::from_env()?;
//! let retriever = Retriever::from_config(&config).await?;
//!
//! let result = retriever.search("friendship and magic", None).await?;
//! if let Some(best) = result.best() {
//!     println!("{} ({:.3})", best.title(), best.distance());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod types;

pub use config::{
    EmbeddingConfig, EmbeddingProviderType, IndexConfig, QueryConfig, RetrievalConfig,
};
pub use engine::{Retriever, RetrieverBuilder};
pub use error::{Result, RetrievalError};
pub use filter::{effective_ceiling, filter, token_count};
pub use types::{Hit, RawResults, SearchResult};
