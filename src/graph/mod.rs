//! Knowledge graph: typed entities, directed labelled relationships, and the
//! vector-index-backed semantic search over them.

mod seed;
mod snapshot;
mod store;
mod traversal;

pub use seed::{BASE_ENTITIES, BASE_RELATIONSHIPS};
pub use snapshot::{GraphSnapshot, NodeRecord};
pub use store::{EntityInfo, IngestCounts, KnowledgeGraph, RelatedEntity, SearchResult};
pub use traversal::TraversalStep;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form attributes carried on edges and in `EntityAttributes::extra`
pub type Attributes = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Satellite,
    Product,
    Service,
    Organization,
    Location,
    Date,
    Technical,
    /// Endpoint created implicitly by a relationship
    Unknown,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Satellite => "SATELLITE",
            EntityType::Product => "PRODUCT",
            EntityType::Service => "SERVICE",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Location => "LOCATION",
            EntityType::Date => "DATE",
            EntityType::Technical => "TECHNICAL",
            EntityType::Unknown => "UNKNOWN",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EntityType::Satellite => "satellite missions and spacecraft",
            EntityType::Product => "data products and datasets",
            EntityType::Service => "portal services and tools",
            EntityType::Organization => "organizations and institutions",
            EntityType::Location => "geographical locations",
            EntityType::Date => "dates and temporal information",
            EntityType::Technical => "technical specifications and parameters",
            EntityType::Unknown => "untyped relationship endpoint",
        }
    }

    /// Map a recogniser or gazetteer label to an entity type.
    ///
    /// Unrecognised labels become `Technical`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "ORG" | "PERSON" => EntityType::Organization,
            "GPE" => EntityType::Location,
            "DATE" => EntityType::Date,
            "PRODUCT" | "WORK_OF_ART" | "DATA_PRODUCTS" => EntityType::Product,
            "EVENT" | "FAC" | "SERVICES" => EntityType::Service,
            "SATELLITES" => EntityType::Satellite,
            _ => EntityType::Technical,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = crate::error::SatqaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SATELLITE" => Ok(EntityType::Satellite),
            "PRODUCT" => Ok(EntityType::Product),
            "SERVICE" => Ok(EntityType::Service),
            "ORGANIZATION" => Ok(EntityType::Organization),
            "LOCATION" => Ok(EntityType::Location),
            "DATE" => Ok(EntityType::Date),
            "TECHNICAL" => Ok(EntityType::Technical),
            "UNKNOWN" => Ok(EntityType::Unknown),
            other => Err(crate::error::SatqaError::InvalidInput(format!(
                "Unknown entity type: {}",
                other
            ))),
        }
    }
}

/// Node attributes: a fixed core plus open extension fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAttributes {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(flatten)]
    pub extra: Attributes,
}

impl EntityAttributes {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

/// A directed labelled edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub relation: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Graph key for a surface form: trimmed, whitespace runs joined by `_`.
pub fn normalize_entity_id(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}
