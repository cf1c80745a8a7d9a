use crate::graph::{normalize_entity_id, Attributes, EntityAttributes, EntityType, Relationship};
use crate::ingest::ContentRecord;
use crate::nlp::TextAnalyzer;
use crate::search::{Metadata, VectorIndex};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub entity_type: EntityType,
    pub attributes: EntityAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct EdgeKey {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// One neighbour of an entity. Incoming edges carry an `inverse_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedEntity {
    pub entity: String,
    pub relation: String,
}

/// A semantic search hit hydrated from the graph
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub description: String,
    pub score: f32,
    pub related_entities: Vec<RelatedEntity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub attributes: EntityAttributes,
    pub related_entities: Vec<RelatedEntity>,
    /// Distinct successor nodes
    pub neighbors_count: usize,
}

/// What one `add_content` call inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounts {
    pub entities: usize,
    pub relationships: usize,
}

/// Directed multigraph keyed by entity id, with edges keyed by
/// `(source, target, relation)`.
///
/// Every described entity is mirrored into the owned `VectorIndex` as
/// `"{id} {type} {description}"`, so `semantic_search` ranks entities by
/// their description.
pub struct KnowledgeGraph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<EdgeKey, Attributes>,
    outgoing: HashMap<String, Vec<(String, String)>>,
    incoming: HashMap<String, Vec<(String, String)>>,
    index: VectorIndex,
}

impl KnowledgeGraph {
    pub fn new(index: VectorIndex) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            index,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut VectorIndex {
        &mut self.index
    }

    /// Insert or replace an entity and re-embed its description.
    ///
    /// Attributes are replaced wholesale; existing relationships are kept.
    /// An embedding failure is logged and leaves the node in place.
    pub async fn add_entity(&mut self, entity_id: &str, entity_type: EntityType, attributes: EntityAttributes) {
        let text = format!("{} {} {}", entity_id, entity_type, attributes.description);

        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), json!(entity_type.as_str()));
        if let Some(url) = &attributes.source_url {
            metadata.insert("source_url".to_string(), json!(url));
        }

        self.nodes.insert(
            entity_id.to_string(),
            Node {
                entity_type,
                attributes,
            },
        );

        if let Err(e) = self.index.add_document(entity_id, &text, Some(metadata)).await {
            log::warn!("Failed to index entity {}: {}", entity_id, e);
        }
    }

    /// Insert a directed edge. Missing endpoints are created as `Unknown`
    /// entities (not embedded). A repeated triple replaces the attributes.
    pub fn add_relationship(&mut self, source: &str, target: &str, relation: &str, attributes: Attributes) {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                log::debug!("Creating placeholder entity {}", endpoint);
                self.nodes.insert(
                    endpoint.to_string(),
                    Node {
                        entity_type: EntityType::Unknown,
                        attributes: EntityAttributes::default(),
                    },
                );
            }
        }

        let key = EdgeKey {
            source: source.to_string(),
            target: target.to_string(),
            relation: relation.to_string(),
        };

        if self.edges.insert(key, attributes).is_none() {
            self.outgoing
                .entry(source.to_string())
                .or_default()
                .push((target.to_string(), relation.to_string()));
            self.incoming
                .entry(target.to_string())
                .or_default()
                .push((source.to_string(), relation.to_string()));
        }
    }

    /// Re-embed every typed entity, e.g. after restoring a snapshot without
    /// its index file. Returns the number of entities submitted.
    pub async fn reindex(&mut self) -> usize {
        let entities: Vec<(String, EntityType, EntityAttributes)> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.entity_type != EntityType::Unknown)
            .map(|(id, node)| (id.clone(), node.entity_type, node.attributes.clone()))
            .collect();

        let count = entities.len();
        for (id, entity_type, attributes) in entities {
            self.add_entity(&id, entity_type, attributes).await;
        }
        log::info!("Re-indexed {} entities", count);
        count
    }

    /// Extract entities and relationships from a scraped page and upsert them.
    ///
    /// Never fails: the counts report what was inserted.
    pub async fn add_content(&mut self, record: &ContentRecord, analyzer: &TextAnalyzer) -> IngestCounts {
        let mut counts = IngestCounts::default();
        let source = record.url.as_deref().unwrap_or("unknown source");

        for entity in analyzer.extract_entities(&record.text) {
            let entity_id = normalize_entity_id(&entity.text);
            if entity_id.is_empty() {
                continue;
            }
            let attributes = EntityAttributes {
                description: format!("Entity from {}", source),
                source_url: record.url.clone(),
                confidence: Some(entity.confidence),
                extra: Attributes::new(),
            };
            self.add_entity(&entity_id, EntityType::from_label(&entity.label), attributes)
                .await;
            counts.entities += 1;
        }

        for rel in analyzer.extract_relationships(&record.text) {
            self.add_relationship(
                &normalize_entity_id(&rel.source),
                &normalize_entity_id(&rel.target),
                &rel.relation,
                Attributes::new(),
            );
            counts.relationships += 1;
        }

        log::debug!(
            "Added {} entities and {} relationships from {}",
            counts.entities,
            counts.relationships,
            source
        );
        counts
    }

    /// One-hop neighbourhood: outgoing `(target, relation)` first, then
    /// incoming `(source, inverse_relation)`. Empty for unknown entities.
    pub fn find_related_entities(&self, entity: &str) -> Vec<RelatedEntity> {
        let outgoing = self.outgoing.get(entity).into_iter().flatten().map(|(target, relation)| {
            RelatedEntity {
                entity: target.clone(),
                relation: relation.clone(),
            }
        });
        let incoming = self.incoming.get(entity).into_iter().flatten().map(|(source, relation)| {
            RelatedEntity {
                entity: source.clone(),
                relation: format!("inverse_{}", relation),
            }
        });
        outgoing.chain(incoming).collect()
    }

    /// Rank entities by description similarity and attach their neighbours.
    ///
    /// Index hits without a graph node are skipped.
    pub async fn semantic_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        self.index
            .search(query, top_k)
            .await
            .into_iter()
            .filter_map(|hit| {
                let node = self.nodes.get(&hit.doc_id)?;
                Some(SearchResult {
                    related_entities: self.find_related_entities(&hit.doc_id),
                    entity: hit.doc_id,
                    entity_type: node.entity_type,
                    description: node.attributes.description.clone(),
                    score: hit.score,
                })
            })
            .collect()
    }

    pub fn get_entity_info(&self, entity: &str) -> Option<EntityInfo> {
        let node = self.nodes.get(entity)?;
        let neighbors_count = self
            .successors(entity)
            .map(|(target, _)| target.as_str())
            .collect::<HashSet<_>>()
            .len();

        Some(EntityInfo {
            entity: entity.to_string(),
            entity_type: node.entity_type,
            attributes: node.attributes.clone(),
            related_entities: self.find_related_entities(entity),
            neighbors_count,
        })
    }

    pub fn entity_type(&self, entity: &str) -> Option<EntityType> {
        self.nodes.get(entity).map(|n| n.entity_type)
    }

    pub fn contains_entity(&self, entity: &str) -> bool {
        self.nodes.contains_key(entity)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn get_entity_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_relationship_count(&self) -> usize {
        self.edges.len()
    }

    /// Entity counts per type, in first-seen type order.
    pub fn type_counts(&self) -> IndexMap<EntityType, usize> {
        let mut counts = IndexMap::new();
        for node in self.nodes.values() {
            *counts.entry(node.entity_type).or_insert(0) += 1;
        }
        counts
    }

    pub(super) fn successors<'a>(&'a self, entity: &str) -> impl Iterator<Item = &'a (String, String)> + 'a {
        self.outgoing.get(entity).into_iter().flatten()
    }

    pub(super) fn nodes(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }

    pub(super) fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.edges.iter().map(|(key, attributes)| Relationship {
            source: key.source.clone(),
            target: key.target.clone(),
            relation: key.relation.clone(),
            attributes: attributes.clone(),
        })
    }

    /// Drop all nodes and edges. The vector index is left as is.
    pub(super) fn clear_structure(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }

    /// Insert a node without touching the vector index.
    pub(super) fn insert_node(&mut self, entity_id: String, node: Node) {
        self.nodes.insert(entity_id, node);
    }
}
