//! Error types for the embeddings system.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Provider not configured.
    #[error("embedding provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// No texts were given to embed.
    #[error("no texts to embed")]
    EmptyInput,

    /// API request failed with a non-retryable status.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider answered with a server-side failure.
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded. `retry_after_secs` is zero when the provider
    /// gave no hint.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Every retry attempt failed with a transient error.
    #[error("embedding request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<EmbeddingError>,
    },

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EmbeddingError {
    /// Whether a failed call may succeed if issued again unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::ServerError { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// How long the provider asked callers to wait, if it said.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } if *retry_after_secs > 0 => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(EmbeddingError::RateLimited { retry_after_secs: 1 }.is_transient());
        assert!(EmbeddingError::Timeout("slow".to_string()).is_transient());
        assert!(
            EmbeddingError::ServerError {
                status: 503,
                message: "busy".to_string()
            }
            .is_transient()
        );

        assert!(!EmbeddingError::EmptyInput.is_transient());
        assert!(!EmbeddingError::ApiRequest("bad key".to_string()).is_transient());
        assert!(!EmbeddingError::ProviderNotConfigured("openai".to_string()).is_transient());
    }
}
