pub mod assistant;
pub mod cache;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod llm;
pub mod nlp;
pub mod search;
pub mod state;

pub use assistant::{Assistant, Response};
pub use config::Config;
pub use error::{Result, SatqaError};
pub use graph::{EntityType, KnowledgeGraph};
pub use nlp::TextAnalyzer;
pub use search::VectorIndex;
