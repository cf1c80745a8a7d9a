//! OpenAI-compatible chat completion client.

use crate::config::LlmConfig;
use crate::error::{Result, SatqaError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_RETRIES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions over HTTP
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the endpoint
    /// * `config` - Model, base URL and sampling parameters
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SatqaError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Build the configured client.
    ///
    /// Returns `Ok(None)` when the chat model is disabled or its API key is
    /// not set; answers then come from the intent handlers.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        if !config.enabled {
            log::info!("Chat model disabled; answers use built-in intent responses");
            return Ok(None);
        }

        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                log::info!("Using chat model {}", config.model);
                Ok(Some(Self::new(key, config)?))
            }
            _ => {
                log::warn!(
                    "Environment variable {} not set; answers use built-in intent responses",
                    config.api_key_env
                );
                Ok(None)
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the conversation and return the trimmed reply.
    ///
    /// 429 and 5xx responses are retried with exponential backoff.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut attempt = 0;
        let mut delay = Duration::from_millis(500);

        loop {
            match self.complete_once(messages).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < MAX_RETRIES && is_retryable(&e) => {
                    attempt += 1;
                    log::warn!(
                        "Chat completion failed (attempt {}): {}. Retrying in {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn complete_once(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SatqaError::Llm(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SatqaError::Llm(format!(
                "Chat API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SatqaError::Llm(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| SatqaError::Llm("Chat API returned no content".to_string()))
    }
}

fn is_retryable(error: &SatqaError) -> bool {
    let message = error.to_string();
    ["error 429", "error 500", "error 502", "error 503", "error 504", "Network error"]
        .iter()
        .any(|marker| message.contains(marker))
}
