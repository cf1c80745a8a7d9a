use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub satqa: SatqaConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Storage and logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SatqaConfig {
    /// Directory holding `graph.json` and `vectors.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SatqaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Embeddings configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    /// `openai`, `hashing` or `none`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            api_key_env: default_api_key_env(),
            batch_size: default_batch_size(),
            dimensions: default_dimensions(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Optional analyzer passes
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_true")]
    pub ner_enabled: bool,
    #[serde(default = "default_true")]
    pub dependency_enabled: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ner_enabled: true,
            dependency_enabled: true,
        }
    }
}

/// Retrieval orchestrator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_context_entries")]
    pub context_entries: usize,
    #[serde(default = "default_related_per_entry")]
    pub related_per_entry: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Exchanges replayed to the chat model on each turn.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_entries: default_context_entries(),
            related_per_entry: default_related_per_entry(),
            history_limit: default_history_limit(),
            history_window: default_history_window(),
        }
    }
}

/// Chat completion configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_chat_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "hashing".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_dimensions() -> usize {
    384
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> usize {
    5
}

fn default_context_entries() -> usize {
    3
}

fn default_related_per_entry() -> usize {
    3
}

fn default_history_limit() -> usize {
    10
}

fn default_history_window() -> usize {
    3
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in SATQA_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("SATQA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load and validate a specific config file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !matches!(
            self.embeddings.provider.as_str(),
            "openai" | "hashing" | "none"
        ) {
            anyhow::bail!(
                "embeddings.provider must be one of openai, hashing, none (got {})",
                self.embeddings.provider
            );
        }

        if self.embeddings.dimensions == 0 {
            anyhow::bail!("embeddings.dimensions must be greater than 0");
        }

        if self.embeddings.batch_size == 0 {
            anyhow::bail!("embeddings.batch_size must be greater than 0");
        }

        if self.retrieval.top_k == 0 {
            anyhow::bail!("retrieval.top_k must be greater than 0");
        }

        if self.retrieval.context_entries > self.retrieval.top_k {
            anyhow::bail!("retrieval.context_entries must not exceed retrieval.top_k");
        }

        if self.retrieval.history_limit == 0 {
            anyhow::bail!("retrieval.history_limit must be greater than 0");
        }

        if self.retrieval.history_window > self.retrieval.history_limit {
            anyhow::bail!("retrieval.history_window must not exceed retrieval.history_limit");
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!("llm.temperature must be between 0.0 and 2.0");
        }

        Ok(())
    }

    /// Path of the persisted graph snapshot
    pub fn graph_path(&self) -> PathBuf {
        self.satqa.data_dir.join("graph.json")
    }

    /// Path of the persisted vector index
    pub fn index_path(&self) -> PathBuf {
        self.satqa.data_dir.join("vectors.json")
    }
}
