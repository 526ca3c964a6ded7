//! Error types for vector collections.

use std::path::PathBuf;

use shelfwise_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for vector store operations.
pub type Result<T> = std::result::Result<T, VectorStoreError>;

/// Errors that can occur while building, persisting or querying a collection.
#[derive(Error, Debug)]
pub enum VectorStoreError {
    /// No persisted collection with this name.
    #[error("collection not found: {0}")]
    NotFound(String),

    /// Collection names double as file names.
    #[error("invalid collection name: {0:?}")]
    InvalidName(String),

    /// `add` was given an id that is already stored.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Parallel columns passed to a bulk insert differ in length.
    #[error(
        "column length mismatch: {ids} ids, {documents} documents, {embeddings} embeddings, {metadatas} metadatas"
    )]
    LengthMismatch {
        ids: usize,
        documents: usize,
        embeddings: usize,
        metadatas: usize,
    },

    /// Vector dimension differs from the collection's.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Reading or writing a collection file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Distance computation failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl VectorStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
