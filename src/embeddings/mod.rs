//! Embedding backends behind the vector index.
//!
//! The backend is an explicit value: `Option<EmbeddingBackend>` being `None`
//! is the "no embedding model" configuration state.

pub mod hashing;
pub mod openai;

pub use hashing::HashingEmbedder;
pub use openai::OpenAIEmbedder;

use crate::cache::EmbeddingCache;
use crate::config::EmbeddingsConfig;
use crate::error::Result;
use std::sync::Arc;

const QUERY_RETRIES: usize = 3;

pub enum EmbeddingBackend {
    OpenAI(OpenAIEmbedder),
    Hashing(HashingEmbedder),
}

impl EmbeddingBackend {
    /// Build the configured backend.
    ///
    /// Returns `Ok(None)` when the provider is `none` or when the remote
    /// provider's API key is missing. The reason is logged at info level;
    /// `VectorIndex::new` emits the degradation warning.
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Option<Self>> {
        match config.provider.as_str() {
            "openai" => {
                let api_key = match std::env::var(&config.api_key_env) {
                    Ok(key) if !key.trim().is_empty() => key,
                    _ => {
                        log::info!(
                            "Environment variable {} not set; no OpenAI embeddings",
                            config.api_key_env
                        );
                        return Ok(None);
                    }
                };
                let cache = (config.cache_capacity > 0)
                    .then(|| Arc::new(EmbeddingCache::new(config.cache_capacity)));
                let embedder = OpenAIEmbedder::new(
                    api_key,
                    config.model.clone(),
                    config.batch_size,
                    config.dimensions,
                    cache,
                )?;
                log::info!("Using OpenAI embeddings ({})", config.model);
                Ok(Some(Self::OpenAI(embedder)))
            }
            "hashing" => {
                log::info!("Using local hashing embeddings ({} dims)", config.dimensions);
                Ok(Some(Self::Hashing(HashingEmbedder::new(config.dimensions))))
            }
            other => {
                log::info!("Embedding provider '{}' selected", other);
                Ok(None)
            }
        }
    }

    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::OpenAI(embedder) => embedder.embed_batch(texts).await,
            Self::Hashing(embedder) => Ok(texts.iter().map(|t| embedder.embed(t)).collect()),
        }
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Self::OpenAI(embedder) => embedder.embed_query(text, QUERY_RETRIES).await,
            Self::Hashing(embedder) => Ok(embedder.embed(text)),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Self::OpenAI(embedder) => embedder.dimensions(),
            Self::Hashing(embedder) => embedder.dimension(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::OpenAI(embedder) => format!("openai:{}", embedder.model()),
            Self::Hashing(embedder) => format!("hashing-sha256:{}", embedder.dimension()),
        }
    }

    pub fn cache(&self) -> Option<&Arc<EmbeddingCache>> {
        match self {
            Self::OpenAI(embedder) => embedder.cache(),
            Self::Hashing(_) => None,
        }
    }
}
