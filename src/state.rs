//! Opening and persisting the on-disk graph and index under `data_dir`.

use crate::config::Config;
use crate::embeddings::EmbeddingBackend;
use crate::error::{Result, SatqaError};
use crate::graph::KnowledgeGraph;
use crate::search::VectorIndex;

/// Where a freshly opened graph came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOrigin {
    /// Restored from `graph.json`
    Snapshot,
    /// No snapshot found; seeded with the base MOSDAC entities
    Seeded,
}

/// Build the embedding backend from config and open the persisted graph.
///
/// A missing snapshot seeds the base entities. A snapshot whose index file is
/// missing, empty, or written by a different backend is re-embedded when a
/// backend is available.
pub async fn open_knowledge_graph(config: &Config) -> Result<(KnowledgeGraph, GraphOrigin)> {
    let backend = EmbeddingBackend::from_config(&config.embeddings)?;
    if let Some(backend) = &backend {
        log::info!("Embedding backend: {}", backend.name());
    }

    let mut graph = KnowledgeGraph::new(VectorIndex::new(backend));

    if !graph.load_snapshot(&config.graph_path())? {
        log::info!("No snapshot at {}, seeding base entities", config.graph_path().display());
        graph.initialize_base_entities().await;
        return Ok((graph, GraphOrigin::Seeded));
    }

    let index_usable = match graph.index_mut().load_from_file(&config.index_path()) {
        Ok(loaded) => loaded && !graph.index().is_empty(),
        Err(SatqaError::Index(reason)) => {
            log::warn!("Discarding stored vector index: {}", reason);
            false
        }
        Err(e) => return Err(e),
    };
    if !index_usable && graph.index().embedding_available() {
        log::info!("Vector index missing or stale, re-embedding entities");
        graph.reindex().await;
    }

    log::info!(
        "Loaded graph: {} entities, {} relationships, {} indexed documents",
        graph.get_entity_count(),
        graph.get_relationship_count(),
        graph.index().len()
    );
    Ok((graph, GraphOrigin::Snapshot))
}

/// Write `graph.json` and `vectors.json` under the configured data directory.
pub fn save_knowledge_graph(graph: &KnowledgeGraph, config: &Config) -> Result<()> {
    graph.save_snapshot(&config.graph_path())?;
    graph.index().save_to_file(&config.index_path())?;
    log::info!("Saved graph and index to {}", config.satqa.data_dir.display());
    Ok(())
}
