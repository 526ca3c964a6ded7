//! Batched, retrying front end over an [`EmbeddingProvider`].

use std::sync::Arc;

use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest};
use crate::retry::RetryPolicy;

/// Default number of texts sent per provider request.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Embeds texts through a provider, splitting large inputs into batches and
/// retrying transient failures per batch.
///
/// Output always has one vector per input, in input order; any failure
/// fails the whole call.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    retry: RetryPolicy,
    batch_size: usize,
}

impl EmbeddingClient {
    /// Create a client over `provider`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the batch size; zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Model the provider embeds with.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embed every text, preserving order.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let provider = &self.provider;
        let model = provider.model();

        let mut embeddings = Vec::with_capacity(texts.len());
        for (batch_no, batch) in texts.chunks(self.batch_size).enumerate() {
            debug!(
                "Embedding batch {batch_no} ({} texts) with {}",
                batch.len(),
                provider.name()
            );

            let response = self
                .retry
                .run(move |_| {
                    let request = EmbeddingRequest::new(batch.to_vec()).with_model(model);
                    provider.embed(request)
                })
                .await?;

            if response.embeddings.len() != batch.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            embeddings.extend(response.embeddings);
        }

        Ok(embeddings)
    }

    /// Embed a single text.
    pub async fn embed_text(&self, text: &str) -> Result<Embedding> {
        self.embed_texts(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding returned".to_string()))
    }
}
