//! # Embeddings
//!
//! This crate turns text into dense vectors for the shelfwise retrieval
//! pipeline.
//!
//! ## Features
//!
//! - **Providers**: OpenAI embeddings API, plus a deterministic hashing
//!   provider for offline use
//! - **Retries**: bounded exponential backoff on rate limits and timeouts
//! - **Batching**: large inputs are split into provider-sized requests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingClient ──► RetryPolicy ──► EmbeddingProvider         │
//! │       │                                    │                    │
//! │       ▼                                    ▼                    │
//! │  Vec<Embedding>                  OpenAI / Hashing               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod retry;
pub mod similarity;

pub use client::{DEFAULT_BATCH_SIZE, EmbeddingClient};
pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashingProvider, OpenAIProvider,
};
pub use retry::RetryPolicy;
pub use similarity::{cosine_distance, cosine_similarity, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
