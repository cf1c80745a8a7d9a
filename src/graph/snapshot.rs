//! JSON export and restore of the graph structure.
//!
//! Restoring does not re-embed: the vector index is persisted on its own.

use crate::error::Result;
use crate::graph::store::Node;
use crate::graph::{EntityAttributes, EntityType, KnowledgeGraph, Relationship};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(flatten)]
    pub attributes: EntityAttributes,
}

/// Nodes and edges in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<Relationship>,
}

impl GraphSnapshot {
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl KnowledgeGraph {
    pub fn export_graph_data(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes()
                .map(|(id, node)| NodeRecord {
                    id: id.clone(),
                    entity_type: node.entity_type,
                    attributes: node.attributes.clone(),
                })
                .collect(),
            edges: self.relationships().collect(),
        }
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.export_graph_data().write(path)?;
        log::info!(
            "Saved graph ({} entities, {} relationships) to {}",
            self.get_entity_count(),
            self.get_relationship_count(),
            path.display()
        );
        Ok(())
    }

    /// Replace nodes and edges with the snapshot's contents.
    ///
    /// Returns `Ok(false)` without touching the graph when the file is missing.
    pub fn load_snapshot(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            log::debug!("No graph snapshot at {}", path.display());
            return Ok(false);
        }

        let snapshot = GraphSnapshot::read(path)?;
        self.restore(snapshot);
        log::info!(
            "Loaded graph ({} entities, {} relationships) from {}",
            self.get_entity_count(),
            self.get_relationship_count(),
            path.display()
        );
        Ok(true)
    }

    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.clear_structure();
        for record in snapshot.nodes {
            self.insert_node(
                record.id,
                Node {
                    entity_type: record.entity_type,
                    attributes: record.attributes,
                },
            );
        }
        for edge in snapshot.edges {
            self.add_relationship(&edge.source, &edge.target, &edge.relation, edge.attributes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingBackend, HashingEmbedder};
    use crate::search::VectorIndex;
    use serde_json::json;

    fn hashing_index() -> VectorIndex {
        VectorIndex::new(Some(EmbeddingBackend::Hashing(HashingEmbedder::new(384))))
    }

    #[tokio::test]
    async fn test_export_layout() {
        let mut graph = KnowledgeGraph::new(hashing_index());
        graph.initialize_base_entities().await;

        let value = serde_json::to_value(graph.export_graph_data()).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 15);
        assert_eq!(value["nodes"][0]["id"], json!("ISRO"));
        assert_eq!(value["nodes"][0]["type"], json!("ORGANIZATION"));
        assert_eq!(
            value["nodes"][0]["description"],
            json!("Indian Space Research Organisation")
        );
        assert_eq!(value["edges"][0]["source"], json!("ISRO"));
        assert_eq!(value["edges"][0]["relation"], json!("operates"));
        assert_eq!(value["edges"][0]["target"], json!("MOSDAC"));
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_with_index() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let graph_path = temp_dir.path().join("graph.json");
        let index_path = temp_dir.path().join("vectors.json");

        let mut graph = KnowledgeGraph::new(hashing_index());
        graph.initialize_base_entities().await;
        graph.add_relationship("SST", "NetCDF", "distributed_as", Default::default());
        graph.save_snapshot(&graph_path).unwrap();
        graph.index().save_to_file(&index_path).unwrap();
        let before = graph.semantic_search("ocean wind data", 5).await;

        let mut restored = KnowledgeGraph::new(hashing_index());
        assert!(restored.load_snapshot(&graph_path).unwrap());
        assert!(restored.index_mut().load_from_file(&index_path).unwrap());

        assert_eq!(restored.export_graph_data(), graph.export_graph_data());
        assert_eq!(restored.entity_type("NetCDF"), Some(EntityType::Unknown));

        let after = restored.semantic_search("ocean wind data", 5).await;
        let ids = |r: &[crate::graph::SearchResult]| -> Vec<String> {
            r.iter().map(|x| x.entity.clone()).collect()
        };
        assert_eq!(ids(&after), ids(&before));
    }

    #[test]
    fn test_load_missing_snapshot_keeps_graph() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut graph = KnowledgeGraph::new(VectorIndex::new(None));
        graph.add_relationship("a", "b", "r", Default::default());

        assert!(!graph.load_snapshot(&temp_dir.path().join("missing.json")).unwrap());
        assert_eq!(graph.get_relationship_count(), 1);
    }
}
