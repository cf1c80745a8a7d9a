use crate::cache::EmbeddingCache;
use crate::error::{Result, SatqaError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI accepts at most this many inputs per request
const MAX_BATCH_SIZE: usize = 2048;

/// Request structure for OpenAI embeddings API
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

/// Response structure from OpenAI embeddings API
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Individual embedding data in API response
#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embeddings client
///
/// Handles batch embedding generation with retry logic and rate limiting.
/// Query embeddings go through an optional LRU cache.
pub struct OpenAIEmbedder {
    client: Client,
    api_key: String,
    model: String,
    batch_size: usize,
    dimensions: usize,
    cache: Option<Arc<EmbeddingCache>>,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name (e.g., "text-embedding-3-small")
    /// * `batch_size` - Maximum number of texts per API request (capped at 2048)
    /// * `dimensions` - Requested output dimensionality
    /// * `cache` - Optional cache for query embeddings
    pub fn new(
        api_key: String,
        model: String,
        batch_size: usize,
        dimensions: usize,
        cache: Option<Arc<EmbeddingCache>>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SatqaError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            batch_size: batch_size.clamp(1, MAX_BATCH_SIZE),
            dimensions,
            cache,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn cache(&self) -> Option<&Arc<EmbeddingCache>> {
        self.cache.as_ref()
    }

    /// Embed a batch of texts, splitting into API-sized requests.
    ///
    /// Returns one vector per input, in input order.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let embeddings = self.embed_batch_internal(chunk).await?;
            all_embeddings.extend(embeddings);

            // Rate limiting between full batches
            if chunk.len() == self.batch_size {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }

        Ok(all_embeddings)
    }

    /// Single API request
    async fn embed_batch_internal(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SatqaError::Embedding(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(SatqaError::Embedding(format!(
                "OpenAI API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let mut result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| SatqaError::Embedding(format!("Failed to parse response: {}", e)))?;

        if result.data.len() != texts.len() {
            return Err(SatqaError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Embed a single query, consulting the cache first.
    pub async fn embed_query(&self, text: &str, max_retries: usize) -> Result<Vec<f32>> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(text) {
                log::debug!("Embedding cache hit for query: {}", text);
                return Ok(cached);
            }
        }

        let embedding = self.embed_with_retry(text, max_retries).await?;

        if let Some(cache) = &self.cache {
            cache.put(text, embedding.clone());
        }

        Ok(embedding)
    }

    /// Embed a single text, retrying 429 and 5xx responses with exponential backoff.
    pub async fn embed_with_retry(&self, text: &str, max_retries: usize) -> Result<Vec<f32>> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);
        let input = [text.to_string()];

        loop {
            match self.embed_batch_internal(&input).await {
                Ok(mut embeddings) => {
                    log::debug!(
                        "Embedding API call took {:?} (attempt {})",
                        start.elapsed(),
                        attempt + 1
                    );
                    return embeddings
                        .pop()
                        .ok_or_else(|| SatqaError::Embedding("Empty response from OpenAI API".to_string()));
                }
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    log::warn!("Retry {}/{} after error: {}", attempt + 1, max_retries, e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Rate limits and server-side failures are worth another attempt.
fn is_retryable(err: &SatqaError) -> bool {
    let message = err.to_string();
    ["error 429", "error 500", "error 502", "error 503", "error 504", "Network error"]
        .iter()
        .any(|marker| message.contains(marker))
}
