//! The retrieval facade: query text in, ranked and filtered hits out.

use std::sync::Arc;

use shelfwise_embeddings::EmbeddingClient;
use shelfwise_vector_store::{TITLE_KEY, VectorIndex, VectorStore};
use tracing::{debug, info};

use crate::config::{QueryConfig, RetrievalConfig};
use crate::error::{Result, RetrievalError};
use crate::filter::{filter, token_count};
use crate::types::{Hit, SearchResult};

/// Single entry point for searching the book index.
///
/// Each search makes one embedding call and one index query; the retriever
/// itself holds no per-request state, so it can be shared across tasks.
#[derive(Clone)]
pub struct Retriever {
    client: EmbeddingClient,
    index: Arc<dyn VectorIndex>,
    config: QueryConfig,
}

impl Retriever {
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::new()
    }

    /// Open the configured collection and embedding provider.
    pub async fn from_config(config: &RetrievalConfig) -> Result<Self> {
        config.validate()?;

        let client = config.embedding.build_client()?;
        let store = VectorStore::new(&config.index.path);
        let collection = store.open_collection(&config.index.collection).await?;

        info!(
            "Retriever ready: collection {} ({} entries), provider {}, model {}",
            collection.name(),
            collection.count(),
            client.provider_name(),
            client.model()
        );

        Self::builder()
            .client(client)
            .index(Arc::new(collection))
            .config(config.query)
            .build()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Model the query embeddings are produced with.
    pub fn query_model(&self) -> &str {
        self.client.model()
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Search for up to `k` books relevant to `query`.
    ///
    /// `k` defaults to the configured `top_k`. An empty `hits` list means no
    /// candidate was close enough and is not an error.
    pub async fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResult> {
        let k = k.unwrap_or(self.config.top_k);
        if k == 0 {
            return Err(RetrievalError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        // Distances from different models are not comparable.
        let index_model = &self.index.build_info().embed_model;
        if index_model != self.client.model() {
            return Err(RetrievalError::ConfigurationMismatch {
                index_model: index_model.clone(),
                query_model: self.client.model().to_string(),
            });
        }

        let vector = self.client.embed_text(query).await?;
        let raw = self.index.query(&vector, k).await?;

        let candidates = raw
            .ids()
            .iter()
            .zip(raw.documents())
            .zip(raw.metadatas())
            .zip(raw.distances())
            .map(|(((id, document), metadata), distance)| {
                let title = metadata.get(TITLE_KEY).map_or("", String::as_str);
                Hit::new(id.as_str(), title, document.as_str(), *distance)
            })
            .collect::<Result<Vec<_>>>()?;

        let tokens = token_count(query);
        let mut hits = filter(
            candidates,
            tokens,
            self.config.max_distance,
            self.config.min_results,
        );
        hits.truncate(k);

        debug!(
            "Query with {tokens} tokens: {} of {} candidates kept",
            hits.len(),
            raw.len()
        );

        Ok(SearchResult {
            query: query.to_string(),
            k,
            hits,
            raw,
        })
    }
}

/// Builder for [`Retriever`].
#[derive(Default)]
pub struct RetrieverBuilder {
    client: Option<EmbeddingClient>,
    index: Option<Arc<dyn VectorIndex>>,
    config: QueryConfig,
}

impl RetrieverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: EmbeddingClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Retriever> {
        let client = self.client.ok_or_else(|| {
            RetrievalError::Config("retriever needs an embedding client".to_string())
        })?;
        let index = self
            .index
            .ok_or_else(|| RetrievalError::Config("retriever needs a vector index".to_string()))?;
        if self.config.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be at least 1".to_string()));
        }

        Ok(Retriever {
            client,
            index,
            config: self.config,
        })
    }
}
