//! Entity recognition: domain gazetteer matching plus a rule-based recogniser
//! for general named entities.

use crate::nlp::gazetteer::{DOMAIN_CATEGORIES, LOCATIONS, ORGANIZATIONS, ORGANIZATION_SUFFIXES};
use crate::nlp::ExtractedEntity;
use regex::Regex;
use std::collections::HashSet;

/// Confidence attached to gazetteer hits
pub const GAZETTEER_CONFIDENCE: f32 = 0.9;
/// Confidence attached to recogniser hits
pub const NER_CONFIDENCE: f32 = 0.8;

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

/// Find every case-insensitive occurrence of every gazetteer term.
///
/// Offsets are byte offsets into `text`; the returned `text` is the slice of
/// the input, so the original casing is kept.
pub fn match_domain_terms(text: &str) -> Vec<ExtractedEntity> {
    let haystack = text.to_ascii_uppercase();
    let mut entities = Vec::new();

    for (label, terms) in DOMAIN_CATEGORIES {
        for term in terms.iter() {
            let needle = term.to_ascii_uppercase();
            for (start, _) in haystack.match_indices(needle.as_str()) {
                let end = start + needle.len();
                entities.push(ExtractedEntity {
                    text: text[start..end].to_string(),
                    label: (*label).to_string(),
                    start,
                    end,
                    confidence: GAZETTEER_CONFIDENCE,
                });
            }
        }
    }

    entities
}

/// Pattern-based named-entity recogniser for dates, places and organisations.
#[derive(Debug)]
pub struct RuleBasedRecognizer {
    patterns: Vec<(&'static str, Regex)>,
}

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        let date = format!(
            r"\b(?:\d{{4}}-\d{{2}}-\d{{2}}|(?:\d{{1,2}}\s+)?(?:{months})\.?(?:\s+\d{{1,2}},?)?\s+\d{{4}}|(?:19|20)\d{{2}})\b",
            months = MONTHS
        );
        let org_suffix = format!(
            r"\b(?:[A-Z][\w&-]*\s+(?:(?:of|for|and)\s+(?:the\s+)?)?){{1,5}}(?:{})\b",
            ORGANIZATION_SUFFIXES.join("|")
        );

        let patterns = vec![
            ("DATE", date),
            ("GPE", alternation(LOCATIONS)),
            ("ORG", org_suffix),
            ("ORG", alternation(ORGANIZATIONS)),
        ];

        Self {
            patterns: patterns
                .into_iter()
                .map(|(label, pattern)| {
                    (label, Regex::new(&pattern).expect("Invalid regex pattern"))
                })
                .collect(),
        }
    }

    /// Recognise entities, ordered by start offset.
    pub fn recognize(&self, text: &str) -> Vec<ExtractedEntity> {
        let mut entities: Vec<ExtractedEntity> = self
            .patterns
            .iter()
            .flat_map(|(label, regex)| {
                regex.find_iter(text).map(move |m| ExtractedEntity {
                    text: m.as_str().to_string(),
                    label: (*label).to_string(),
                    start: m.start(),
                    end: m.end(),
                    confidence: NER_CONFIDENCE,
                })
            })
            .collect();

        entities.sort_by_key(|e| (e.start, e.end));
        entities
    }
}

impl Default for RuleBasedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Word-bounded alternation, longest terms first so "Indian Ocean" wins over "India".
fn alternation(terms: &[&str]) -> String {
    let mut sorted: Vec<&str> = terms.to_vec();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let escaped: Vec<String> = sorted.iter().map(|t| regex::escape(t)).collect();
    format!(r"\b(?:{})\b", escaped.join("|"))
}

/// Drop repeats of the same (lowercased text, start, end), keeping the first.
pub fn deduplicate(entities: Vec<ExtractedEntity>) -> Vec<ExtractedEntity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert((e.text.to_lowercase(), e.start, e.end)))
        .collect()
}
