use thiserror::Error;

/// Main error type for SatQA
#[derive(Error, Debug)]
pub enum SatqaError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors for snapshots, index files and records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Chat completion errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector index errors (dimension mismatches, corrupt files)
    #[error("Index error: {0}")]
    Index(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using SatqaError
pub type Result<T> = std::result::Result<T, SatqaError>;
