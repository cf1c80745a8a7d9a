//! Query and content analysis: entities, relationships, keywords, intent.

pub mod entities;
pub mod gazetteer;
pub mod intent;
pub mod keywords;
pub mod relations;

pub use intent::{classify_intent, question_type, Intent, QuestionType};

use crate::config::AnalyzerConfig;
use entities::RuleBasedRecognizer;
use regex::Regex;
use relations::{PatternExtractor, SvoMatcher};
use serde::Serialize;

/// Keywords kept per analysed query
pub const QUERY_KEYWORDS: usize = 5;

/// An entity mention with byte offsets into the analysed text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedEntity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRelationship {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// Structured view of a user query
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnalysis {
    pub original_query: String,
    pub entities: Vec<ExtractedEntity>,
    pub keywords: Vec<String>,
    pub intent: Intent,
    pub question_type: QuestionType,
    /// Non-punctuation tokens in order
    pub tokens: Vec<String>,
}

/// Owns the compiled patterns and the optional recognisers.
///
/// `ner` and `dependency` are `None` when disabled in configuration; the
/// corresponding passes are then skipped and only gazetteer and pattern
/// matching run.
pub struct TextAnalyzer {
    ner: Option<RuleBasedRecognizer>,
    dependency: Option<SvoMatcher>,
    patterns: PatternExtractor,
    token: Regex,
}

impl TextAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        if !config.ner_enabled {
            log::warn!("Named-entity recognition disabled; using domain gazetteers only");
        }
        if !config.dependency_enabled {
            log::warn!("Dependency relations disabled; using lexical patterns only");
        }

        Self {
            ner: config.ner_enabled.then(RuleBasedRecognizer::new),
            dependency: config.dependency_enabled.then(SvoMatcher::new),
            patterns: PatternExtractor::new(),
            token: Regex::new(r"\w+(?:[-'.]\w+)*").expect("Invalid regex pattern"),
        }
    }

    pub fn ner_available(&self) -> bool {
        self.ner.is_some()
    }

    pub fn dependency_available(&self) -> bool {
        self.dependency.is_some()
    }

    /// Recogniser output followed by gazetteer hits, deduplicated by
    /// (lowercased text, start, end).
    pub fn extract_entities(&self, text: &str) -> Vec<ExtractedEntity> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut entities = self
            .ner
            .as_ref()
            .map(|ner| ner.recognize(text))
            .unwrap_or_default();
        entities.extend(entities::match_domain_terms(text));

        entities::deduplicate(entities)
    }

    /// Pattern triples then dependency triples. Not deduplicated across passes.
    pub fn extract_relationships(&self, text: &str) -> Vec<ExtractedRelationship> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut relationships = self.patterns.extract(text);
        if let Some(dependency) = &self.dependency {
            relationships.extend(dependency.extract(text));
        }
        relationships
    }

    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        keywords::top_keywords(self.token.find_iter(text).map(|m| m.as_str()), max_keywords)
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.token
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn preprocess_query(&self, query: &str) -> QueryAnalysis {
        let analysis = QueryAnalysis {
            original_query: query.to_string(),
            entities: self.extract_entities(query),
            keywords: self.extract_keywords(query, QUERY_KEYWORDS),
            intent: classify_intent(query),
            question_type: question_type(query),
            tokens: self.tokens(query),
        };

        log::debug!(
            "Query analysed: intent={} type={} entities={} keywords={:?}",
            analysis.intent,
            analysis.question_type,
            analysis.entities.len(),
            analysis.keywords
        );

        analysis
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer_without_models() -> TextAnalyzer {
        TextAnalyzer::new(&AnalyzerConfig {
            ner_enabled: false,
            dependency_enabled: false,
        })
    }

    #[test]
    fn test_extract_domain_entities() {
        let analyzer = TextAnalyzer::default();
        let entities = analyzer.extract_entities("INSAT provides SST data");

        let insat = entities.iter().find(|e| e.text == "INSAT").unwrap();
        assert_eq!(insat.label, gazetteer::LABEL_SATELLITES);
        assert_eq!(insat.confidence, entities::GAZETTEER_CONFIDENCE);
        let sst = entities.iter().find(|e| e.text == "SST").unwrap();
        assert_eq!(sst.label, gazetteer::LABEL_DATA_PRODUCTS);
    }

    #[test]
    fn test_ner_and_gazetteer_merge_without_duplicates() {
        let analyzer = TextAnalyzer::default();
        let entities = analyzer.extract_entities("ISRO launched OCEANSAT in 2009 over India");

        assert!(entities.iter().any(|e| e.label == "ORG" && e.text == "ISRO"));
        assert!(entities.iter().any(|e| e.label == "DATE" && e.text == "2009"));
        assert!(entities.iter().any(|e| e.label == "GPE" && e.text == "India"));
        assert!(entities.iter().any(|e| e.label == "SATELLITES"));

        let mut keys: Vec<_> = entities
            .iter()
            .map(|e| (e.text.to_lowercase(), e.start, e.end))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn test_capability_flags() {
        let analyzer = analyzer_without_models();
        assert!(!analyzer.ner_available());
        assert!(!analyzer.dependency_available());

        let entities = analyzer.extract_entities("ISRO operates MOSDAC in India");
        assert!(entities.iter().all(|e| e.confidence == entities::GAZETTEER_CONFIDENCE));

        let full = TextAnalyzer::default();
        assert!(full.ner_available());
        assert!(full.dependency_available());
    }

    #[test]
    fn test_relationships_pattern_then_parse() {
        let analyzer = TextAnalyzer::default();
        let rels = analyzer.extract_relationships("INSAT generates SST");

        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].relation, "provides");
        assert_eq!(rels[1].relation, "generate");
        assert!(rels.iter().all(|r| r.source == "INSAT" && r.target == "SST"));

        let lexical_only = analyzer_without_models().extract_relationships("INSAT generates SST");
        assert_eq!(lexical_only.len(), 1);
    }

    #[test]
    fn test_empty_inputs() {
        let analyzer = TextAnalyzer::default();
        assert!(analyzer.extract_entities("").is_empty());
        assert!(analyzer.extract_relationships("").is_empty());
        assert!(analyzer.extract_keywords("", 10).is_empty());
    }

    #[test]
    fn test_preprocess_query() {
        let analyzer = TextAnalyzer::default();
        let analysis = analyzer.preprocess_query("How do I download ocean color data?");

        assert_eq!(analysis.intent, Intent::HowTo);
        assert_eq!(analysis.question_type, QuestionType::How);
        assert_eq!(
            analysis.tokens,
            vec!["How", "do", "I", "download", "ocean", "color", "data"]
        );
        assert!(analysis.keywords.contains(&"ocean".to_string()));
        assert!(analysis.keywords.len() <= QUERY_KEYWORDS);
        assert!(analysis.entities.iter().any(|e| e.text == "ocean color"));
    }
}
