//! Error types for the retrieval facade.

use shelfwise_embeddings::EmbeddingError;
use shelfwise_vector_store::VectorStoreError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while answering a search.
///
/// An empty hit list is not an error; it is returned as `Ok`.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The caller passed a bad `k` or an empty query.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding provider kept failing transiently until retries ran out.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(#[source] EmbeddingError),

    /// The index was built with a different embedding model than queries use.
    #[error(
        "index was built with embedding model {index_model:?} but queries use {query_model:?}"
    )]
    ConfigurationMismatch {
        index_model: String,
        query_model: String,
    },

    /// Embedding failed permanently.
    #[error("embedding error: {0}")]
    Embedding(#[source] EmbeddingError),

    /// Index error.
    #[error("index error: {0}")]
    Index(#[from] VectorStoreError),

    /// The index reported a distance that cannot be ranked.
    #[error("invalid distance {distance} for {id}")]
    InvalidDistance { id: String, distance: f32 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RetrievalError {
    /// Whether this is a service failure rather than a caller mistake.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::InvalidArgument(_))
    }
}

impl From<EmbeddingError> for RetrievalError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmptyInput => Self::InvalidArgument("nothing to embed".to_string()),
            EmbeddingError::RetriesExhausted { .. } => Self::ProviderUnavailable(err),
            other => Self::Embedding(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_errors_map_to_taxonomy() {
        let exhausted = EmbeddingError::RetriesExhausted {
            attempts: 4,
            last: Box::new(EmbeddingError::Timeout("slow".to_string())),
        };
        assert!(matches!(
            RetrievalError::from(exhausted),
            RetrievalError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            RetrievalError::from(EmbeddingError::EmptyInput),
            RetrievalError::InvalidArgument(_)
        ));
        assert!(matches!(
            RetrievalError::from(EmbeddingError::ApiRequest("401".to_string())),
            RetrievalError::Embedding(_)
        ));
    }

    #[test]
    fn test_degraded_versus_caller_errors() {
        assert!(!RetrievalError::InvalidArgument("k".to_string()).is_degraded());
        assert!(
            RetrievalError::ConfigurationMismatch {
                index_model: "a".to_string(),
                query_model: "b".to_string(),
            }
            .is_degraded()
        );
        assert!(RetrievalError::ProviderUnavailable(EmbeddingError::EmptyInput).is_degraded());
    }
}
