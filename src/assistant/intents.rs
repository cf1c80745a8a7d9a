//! Canned and graph-backed answers per query intent, used when no chat model
//! answers.

use crate::graph::{normalize_entity_id, EntityInfo, KnowledgeGraph};
use crate::nlp::{ExtractedEntity, Intent};

const ENTITIES_CONSIDERED: usize = 3;
const RELATED_SHOWN: usize = 3;

const DATA_SEARCH_GUIDE: &str = "\
To search for data on MOSDAC portal:
1. Visit the Data section
2. Use the search filters to narrow down by:
   - Satellite/Mission
   - Product type
   - Date range
   - Geographic region
3. Preview and download the required datasets

Popular data products include:
- Sea Surface Temperature (SST)
- Ocean Color/Chlorophyll
- Wind Speed and Direction
- Land Cover data
- Bathymetry data";

const DATA_SEARCH_UNRESOLVED: &str = "I can help you find specific datasets. Please specify which satellite data or product you're looking for.";

const HOW_TO_GUIDE: &str = "\
Here are common procedures for the MOSDAC portal:

**How to download data:**
1. Register/Login to your MOSDAC account
2. Navigate to the Data section
3. Use search filters to find your dataset
4. Select the data and add to cart
5. Proceed to download

**How to visualize data:**
1. Use the Visualization tools in the portal
2. Select your dataset and region of interest
3. Choose visualization parameters
4. Generate maps, plots, or animations

**How to access via API:**
1. Obtain API credentials from your profile
2. Use the documented API endpoints
3. Authenticate your requests
4. Retrieve data programmatically

Need help with a specific procedure? Please let me know!";

const MOSDAC_OVERVIEW: &str = "\
MOSDAC (Meteorological and Oceanographic Satellite Data Archival Centre) is India's premier facility for:

- **Satellite Data Management**: Archiving and distributing ocean and atmospheric data
- **Data Products**: Processing raw satellite data into useful scientific products
- **User Services**: Providing data access, visualization, and analysis tools
- **Research Support**: Supporting oceanographic and meteorological research

Key features include data from ISRO satellites like OCEANSAT, INSAT, CARTOSAT, and international missions.";

const HELP_TOPICS: &str = "\
I'm here to help you with MOSDAC portal! I can assist with:

**Satellite Data**
- Information about satellite missions and instruments
- Available data products and their specifications
- Data quality and processing levels

**Data Access**
- How to search and find datasets
- Download procedures and formats
- API access and programmatic retrieval

**Visualization Tools**
- Creating maps and plots
- Animation and time-series tools
- Subsetting and analysis features

**Account & Support**
- Registration and login issues
- User profile management
- Technical support contacts

What specific area would you like help with?";

const GENERAL_REPLY: &str = "I'm here to help you with MOSDAC portal information. Please feel free to ask about satellite data, download procedures, visualization tools, or any specific datasets you're looking for.";

/// Answer a query from its intent and detected entities alone.
pub fn intent_response(intent: Intent, entities: &[ExtractedEntity], graph: &KnowledgeGraph) -> String {
    match intent {
        Intent::SearchData => data_search(entities, graph),
        Intent::HowTo => HOW_TO_GUIDE.to_string(),
        Intent::WhatIs | Intent::Information => what_is(entities, graph),
        Intent::Help => HELP_TOPICS.to_string(),
        Intent::WhereIs | Intent::WhenIs | Intent::General => GENERAL_REPLY.to_string(),
    }
}

/// Look up a detected mention: exact normalised id first, then a
/// case-insensitive match.
pub fn resolve_entity(graph: &KnowledgeGraph, mention: &str) -> Option<EntityInfo> {
    let id = normalize_entity_id(mention);
    if let Some(info) = graph.get_entity_info(&id) {
        return Some(info);
    }
    let lower = id.to_lowercase();
    let matched = graph.entity_ids().find(|candidate| candidate.to_lowercase() == lower)?;
    graph.get_entity_info(matched)
}

fn data_search(entities: &[ExtractedEntity], graph: &KnowledgeGraph) -> String {
    if entities.is_empty() {
        return DATA_SEARCH_GUIDE.to_string();
    }

    let infos: Vec<EntityInfo> = entities
        .iter()
        .take(ENTITIES_CONSIDERED)
        .filter_map(|e| resolve_entity(graph, &e.text))
        .collect();

    if infos.is_empty() {
        return DATA_SEARCH_UNRESOLVED.to_string();
    }

    let mut response = String::from("Based on your query, here's information about the requested data:\n\n");
    for info in &infos {
        response.push_str(&format!("**{}** ({})\n", info.entity, info.entity_type));
        response.push_str(&format!("- {}\n", description_or(info, "No description available")));
        if !info.related_entities.is_empty() {
            let related: Vec<&str> = info
                .related_entities
                .iter()
                .take(RELATED_SHOWN)
                .map(|r| r.entity.as_str())
                .collect();
            response.push_str(&format!("- Related: {}\n", related.join(", ")));
        }
        response.push('\n');
    }
    response
}

fn what_is(entities: &[ExtractedEntity], graph: &KnowledgeGraph) -> String {
    let Some(info) = entities.first().and_then(|e| resolve_entity(graph, &e.text)) else {
        return MOSDAC_OVERVIEW.to_string();
    };

    let mut response = format!(
        "**{}** is {}.",
        info.entity,
        description_or(&info, "a component of the MOSDAC system")
    );
    if !info.related_entities.is_empty() {
        let related: Vec<String> = info
            .related_entities
            .iter()
            .take(RELATED_SHOWN)
            .map(|r| format!("{} ({})", r.entity, r.relation))
            .collect();
        response.push_str(&format!("\n\nIt is related to: {}", related.join(", ")));
    }
    response
}

fn description_or<'a>(info: &'a EntityInfo, fallback: &'a str) -> &'a str {
    if info.attributes.description.is_empty() {
        fallback
    } else {
        &info.attributes.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingBackend, HashingEmbedder};
    use crate::nlp::TextAnalyzer;
    use crate::search::VectorIndex;

    async fn seeded() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new(VectorIndex::new(Some(EmbeddingBackend::Hashing(
            HashingEmbedder::new(128),
        ))));
        graph.initialize_base_entities().await;
        graph
    }

    fn respond(query: &str, graph: &KnowledgeGraph) -> String {
        let analysis = TextAnalyzer::default().preprocess_query(query);
        intent_response(analysis.intent, &analysis.entities, graph)
    }

    #[tokio::test]
    async fn test_what_is_known_entity() {
        let graph = seeded().await;
        assert_eq!(
            respond("What is SST?", &graph),
            "**SST** is Sea Surface Temperature data.\n\nIt is related to: INSAT (inverse_generates)"
        );
    }

    #[tokio::test]
    async fn test_what_is_resolves_case_insensitively() {
        let graph = seeded().await;
        assert!(respond("explain bathymetry", &graph).starts_with("**Bathymetry** is Ocean depth measurements."));
    }

    #[tokio::test]
    async fn test_what_is_falls_back_to_overview() {
        let graph = seeded().await;
        assert_eq!(respond("What is this portal?", &graph), MOSDAC_OVERVIEW);
    }

    #[tokio::test]
    async fn test_data_search() {
        let graph = seeded().await;

        let answer = respond("Find OCEANSAT products", &graph);
        assert!(answer.starts_with("Based on your query"));
        assert!(answer.contains("**OCEANSAT** (SATELLITE)\n- Ocean observation satellite series\n- Related: Chlorophyll, Wind_Data\n"));

        assert_eq!(respond("search the archive", &graph), DATA_SEARCH_GUIDE);
        assert_eq!(respond("download NDVI", &graph), DATA_SEARCH_UNRESOLVED);
    }

    #[tokio::test]
    async fn test_static_handlers() {
        let graph = seeded().await;
        assert_eq!(respond("How do I register?", &graph), HOW_TO_GUIDE);
        assert_eq!(respond("I have a problem logging in", &graph), HELP_TOPICS);
        assert_eq!(respond("Good morning", &graph), GENERAL_REPLY);
    }
}
