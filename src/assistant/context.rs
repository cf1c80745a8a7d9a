use crate::config::RetrievalConfig;
use crate::graph::SearchResult;
use crate::nlp::QueryAnalysis;

pub const NO_CONTEXT: &str = "No specific information found in the knowledge base.";
const CONTEXT_HEADER: &str = "Relevant information from MOSDAC knowledge base:";
const QUERY_ENTITIES_SHOWN: usize = 3;

/// How much of the search results goes into the context block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub entries: usize,
    pub related_per_entry: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            entries: 3,
            related_per_entry: 3,
        }
    }
}

impl From<&RetrievalConfig> for ContextLimits {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            entries: config.context_entries,
            related_per_entry: config.related_per_entry,
        }
    }
}

/// Render search results and the query analysis as a plain-text block for the
/// chat model.
pub fn build_context(results: &[SearchResult], analysis: &QueryAnalysis, limits: ContextLimits) -> String {
    if results.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let mut parts = vec![CONTEXT_HEADER.to_string()];

    for (i, result) in results.iter().take(limits.entries).enumerate() {
        let description = if result.description.is_empty() {
            "No description available"
        } else {
            result.description.as_str()
        };

        parts.push(format!("\n{}. {} ({})", i + 1, result.entity, result.entity_type));
        parts.push(format!("   Description: {}", description));

        if !result.related_entities.is_empty() {
            let related: Vec<String> = result
                .related_entities
                .iter()
                .take(limits.related_per_entry)
                .map(|r| format!("{} ({})", r.entity, r.relation))
                .collect();
            parts.push(format!("   Related to: {}", related.join(", ")));
        }
    }

    if !analysis.entities.is_empty() {
        let detected: Vec<&str> = analysis
            .entities
            .iter()
            .take(QUERY_ENTITIES_SHOWN)
            .map(|e| e.text.as_str())
            .collect();
        parts.push(format!("\nDetected entities in query: {}", detected.join(", ")));
    }

    parts.push(format!("Query intent: {}", analysis.intent));

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntityType, RelatedEntity};
    use crate::nlp::TextAnalyzer;

    fn result(entity: &str, entity_type: EntityType, description: &str, related: &[(&str, &str)]) -> SearchResult {
        SearchResult {
            entity: entity.to_string(),
            entity_type,
            description: description.to_string(),
            score: 0.5,
            related_entities: related
                .iter()
                .map(|(e, r)| RelatedEntity {
                    entity: e.to_string(),
                    relation: r.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_no_results() {
        let analysis = TextAnalyzer::default().preprocess_query("What is SST?");
        assert_eq!(build_context(&[], &analysis, ContextLimits::default()), NO_CONTEXT);
    }

    #[test]
    fn test_context_layout() {
        let analysis = TextAnalyzer::default().preprocess_query("What is SST?");
        let results = vec![
            result("SST", EntityType::Product, "Sea Surface Temperature data", &[("INSAT", "inverse_generates")]),
            result("Sea", EntityType::Unknown, "", &[]),
        ];

        let context = build_context(&results, &analysis, ContextLimits::default());
        let expected = "Relevant information from MOSDAC knowledge base:\n\
                        \n1. SST (PRODUCT)\n   Description: Sea Surface Temperature data\n   Related to: INSAT (inverse_generates)\n\
                        \n2. Sea (UNKNOWN)\n   Description: No description available\n\
                        \nDetected entities in query: SST\n\
                        Query intent: what_is";
        assert_eq!(context, expected);
    }

    #[test]
    fn test_limits_apply() {
        let analysis = TextAnalyzer::default().preprocess_query("hello");
        let related = [("a", "r"), ("b", "r"), ("c", "r"), ("d", "r")];
        let results: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|id| result(id, EntityType::Service, "x", &related))
            .collect();

        let context = build_context(&results, &analysis, ContextLimits::default());
        assert!(context.contains("\n3. C (SERVICE)"));
        assert!(!context.contains("4. D"));
        assert!(context.contains("Related to: a (r), b (r), c (r)\n"));
        assert!(!context.contains("d (r)"));
        assert!(!context.contains("Detected entities"));
        assert!(context.ends_with("Query intent: general"));
    }
}
