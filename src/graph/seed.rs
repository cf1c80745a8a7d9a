//! Core portal entities loaded into every fresh graph.

use crate::graph::{Attributes, EntityAttributes, EntityType, KnowledgeGraph};

/// (id, type, description)
pub const BASE_ENTITIES: &[(&str, EntityType, &str)] = &[
    ("ISRO", EntityType::Organization, "Indian Space Research Organisation"),
    (
        "MOSDAC",
        EntityType::Organization,
        "Meteorological and Oceanographic Satellite Data Archival Centre",
    ),
    ("INSAT", EntityType::Satellite, "Indian National Satellite System"),
    ("OCEANSAT", EntityType::Satellite, "Ocean observation satellite series"),
    (
        "CARTOSAT",
        EntityType::Satellite,
        "Earth observation satellite for cartographic applications",
    ),
    (
        "RESOURCESAT",
        EntityType::Satellite,
        "Earth observation satellite for resource monitoring",
    ),
    ("SST", EntityType::Product, "Sea Surface Temperature data"),
    ("Chlorophyll", EntityType::Product, "Ocean chlorophyll concentration data"),
    ("Wind_Data", EntityType::Product, "Ocean wind speed and direction data"),
    ("Land_Cover", EntityType::Product, "Land cover classification data"),
    ("Bathymetry", EntityType::Product, "Ocean depth measurements"),
    ("Data_Download", EntityType::Service, "Portal data download service"),
    ("Visualization", EntityType::Service, "Data visualization tools"),
    ("API_Access", EntityType::Service, "Programmatic data access"),
    ("User_Registration", EntityType::Service, "User account management"),
];

/// (source, relation, target)
pub const BASE_RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("ISRO", "operates", "MOSDAC"),
    ("MOSDAC", "provides", "Data_Download"),
    ("MOSDAC", "provides", "Visualization"),
    ("MOSDAC", "provides", "API_Access"),
    ("INSAT", "generates", "SST"),
    ("OCEANSAT", "generates", "Chlorophyll"),
    ("OCEANSAT", "generates", "Wind_Data"),
    ("CARTOSAT", "generates", "Land_Cover"),
    ("RESOURCESAT", "generates", "Land_Cover"),
];

impl KnowledgeGraph {
    /// Load the base entities and relationships.
    pub async fn initialize_base_entities(&mut self) {
        for (id, entity_type, description) in BASE_ENTITIES {
            self.add_entity(id, *entity_type, EntityAttributes::described(*description))
                .await;
        }
        for (source, relation, target) in BASE_RELATIONSHIPS {
            self.add_relationship(source, target, relation, Attributes::new());
        }

        log::info!(
            "Knowledge graph seeded with {} entities and {} relationships",
            self.get_entity_count(),
            self.get_relationship_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingBackend, HashingEmbedder};
    use crate::search::VectorIndex;

    async fn seeded() -> KnowledgeGraph {
        let index = VectorIndex::new(Some(EmbeddingBackend::Hashing(HashingEmbedder::new(384))));
        let mut graph = KnowledgeGraph::new(index);
        graph.initialize_base_entities().await;
        graph
    }

    #[tokio::test]
    async fn test_seed_counts() {
        let graph = seeded().await;
        assert_eq!(graph.get_entity_count(), 15);
        assert_eq!(graph.get_relationship_count(), 9);
        assert_eq!(graph.index().len(), 15);
        assert_eq!(graph.entity_type("Wind_Data"), Some(EntityType::Product));
    }

    #[tokio::test]
    async fn test_seeded_search_prefers_sst() {
        let graph = seeded().await;
        let results = graph.semantic_search("Sea Surface Temperature", 15).await;

        let position = |id: &str| results.iter().position(|r| r.entity == id);
        let sst = position("SST").unwrap();
        assert_eq!(sst, 0);
        if let Some(registration) = position("User_Registration") {
            assert!(sst < registration);
        }
        assert_eq!(
            results[0].related_entities,
            vec![crate::graph::RelatedEntity {
                entity: "INSAT".into(),
                relation: "inverse_generates".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_mosdac_neighbourhood() {
        let graph = seeded().await;
        let info = graph.get_entity_info("MOSDAC").unwrap();

        let relations: Vec<_> = info
            .related_entities
            .iter()
            .map(|r| (r.entity.as_str(), r.relation.as_str()))
            .collect();
        assert_eq!(
            relations,
            vec![
                ("Data_Download", "provides"),
                ("Visualization", "provides"),
                ("API_Access", "provides"),
                ("ISRO", "inverse_operates"),
            ]
        );
        assert_eq!(info.neighbors_count, 3);
    }
}
