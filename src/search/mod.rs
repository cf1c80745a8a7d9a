//! Vector index: embedding storage, cosine search, metadata filters, persistence.

pub mod index;
pub mod store;
pub mod vector;

pub use index::{IndexStats, VectorIndex};

use serde::Serialize;

/// Free-form per-document metadata
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A stored document and its embedding
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f32,
    /// 1-based position in the returned list
    pub rank: usize,
}
