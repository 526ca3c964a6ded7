//! Configuration for the retrieval pipeline.
//!
//! Values come from environment variables (optionally seeded from a `.env`
//! file). Every variable has a default, so an empty environment yields
//! [`RetrievalConfig::default`].

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shelfwise_embeddings::{
    DEFAULT_BATCH_SIZE, EmbeddingClient, EmbeddingProvider, HashingProvider, OpenAIProvider,
    RetryPolicy,
};

use crate::error::{Result, RetrievalError};

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Where the vector index lives.
    pub index: IndexConfig,

    /// Query-time parameters.
    pub query: QueryConfig,
}

impl RetrievalConfig {
    /// Load a `.env` file if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal.
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables take their defaults; malformed values are
    /// an error naming the variable.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let embedding_defaults = EmbeddingConfig::default();
        let index_defaults = IndexConfig::default();
        let query_defaults = QueryConfig::default();

        let config = Self {
            embedding: EmbeddingConfig {
                provider: parse_var(&get, "EMBED_PROVIDER", embedding_defaults.provider)?,
                model: get("EMBED_MODEL").unwrap_or(embedding_defaults.model),
                batch_size: parse_var(&get, "EMBED_BATCH_SIZE", embedding_defaults.batch_size)?,
                max_retries: parse_var(&get, "EMBED_MAX_RETRIES", embedding_defaults.max_retries)?,
                backoff_base: parse_var(
                    &get,
                    "EMBED_BACKOFF_BASE",
                    embedding_defaults.backoff_base,
                )?,
            },
            index: IndexConfig {
                path: get("INDEX_PATH").map_or(index_defaults.path, PathBuf::from),
                collection: get("COLLECTION_NAME").unwrap_or(index_defaults.collection),
            },
            query: QueryConfig {
                top_k: parse_var(&get, "TOP_K", query_defaults.top_k)?,
                max_distance: parse_var(&get, "MAX_DISTANCE", query_defaults.max_distance)?,
                min_results: parse_var(&get, "MIN_RESULTS", query_defaults.min_results)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.query.top_k == 0 {
            return Err(RetrievalError::Config("TOP_K must be at least 1".to_string()));
        }
        if !(0.0..=2.0).contains(&self.query.max_distance) {
            return Err(RetrievalError::Config(format!(
                "MAX_DISTANCE must be within [0, 2], got {}",
                self.query.max_distance
            )));
        }
        if self.embedding.batch_size == 0 {
            return Err(RetrievalError::Config(
                "EMBED_BATCH_SIZE must be at least 1".to_string(),
            ));
        }
        if !self.embedding.backoff_base.is_finite() || self.embedding.backoff_base < 1.0 {
            return Err(RetrievalError::Config(format!(
                "EMBED_BACKOFF_BASE must be at least 1, got {}",
                self.embedding.backoff_base
            )));
        }
        if self.embedding.model.is_empty() {
            return Err(RetrievalError::Config("EMBED_MODEL must not be empty".to_string()));
        }
        if self.index.collection.is_empty() {
            return Err(RetrievalError::Config(
                "COLLECTION_NAME must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, G>(get: &G, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| RetrievalError::Config(format!("invalid {name}={raw:?}: {e}"))),
    }
}

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API.
    #[default]
    OpenAI,
    /// Deterministic local hashing, no network.
    Hashing,
}

impl FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "hashing" => Ok(Self::Hashing),
            other => Err(format!("unknown provider {other:?} (expected openai or hashing)")),
        }
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderType,

    /// Model for the OpenAI provider. The hashing provider names its own
    /// model.
    pub model: String,

    /// Texts per provider request.
    pub batch_size: usize,

    /// Retries after the first failed attempt.
    pub max_retries: u32,

    pub backoff_base: f64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            provider: EmbeddingProviderType::default(),
            model: "text-embedding-3-small".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: retry.max_retries,
            backoff_base: retry.backoff_base,
        }
    }
}

impl EmbeddingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(self.max_retries)
            .with_backoff_base(self.backoff_base)
    }

    /// Construct the configured provider wrapped in a batching, retrying
    /// client.
    pub fn build_client(&self) -> Result<EmbeddingClient> {
        let provider: Arc<dyn EmbeddingProvider> = match self.provider {
            EmbeddingProviderType::OpenAI => {
                let provider = OpenAIProvider::new().with_model(&self.model);
                if !provider.is_available() {
                    return Err(RetrievalError::Config(
                        "OPENAI_API_KEY is required for the openai provider".to_string(),
                    ));
                }
                Arc::new(provider)
            }
            EmbeddingProviderType::Hashing => Arc::new(HashingProvider::default()),
        };

        Ok(EmbeddingClient::new(provider)
            .with_retry(self.retry_policy())
            .with_batch_size(self.batch_size))
    }
}

/// Location of the persisted vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding collection files.
    pub path: PathBuf,

    pub collection: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("storage/index"),
            collection: "books".to_string(),
        }
    }
}

/// Query-time parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Neighbors requested when the caller gives no `k`.
    pub top_k: usize,

    /// Baseline cosine-distance ceiling the relevance filter adapts from.
    pub max_distance: f64,

    /// Fewer passing candidates than this yields no hits at all.
    pub min_results: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_distance: 0.65,
            min_results: 1,
        }
    }
}

impl QueryConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_min_results(mut self, min_results: usize) -> Self {
        self.min_results = min_results;
        self
    }
}
