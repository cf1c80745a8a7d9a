//! Relationship extraction: fixed lexical patterns and a subject-verb-object
//! matcher.

use crate::nlp::gazetteer::{is_common_word, verb_lemma, FILLER_WORDS};
use crate::nlp::ExtractedRelationship;
use regex::Regex;

/// (pattern, relation label). Source is the first group, target the last.
const RELATION_PATTERNS: &[(&str, &str)] = &[
    (
        r"(?i)(\w+)\s+(provides|offers|contains|includes|generates)\s+(\w+)",
        "provides",
    ),
    (
        r"(?i)(\w+)\s+(is|are)\s+(part of|component of|used by)\s+(\w+)",
        "part_of",
    ),
    (r"(?i)(\w+)\s+(monitors|observes|measures)\s+(\w+)", "monitors"),
    (r"(?i)(\w+)\s+(data|information)\s+(from|of)\s+(\w+)", "source_of"),
    (r"(?i)(\w+)\s+(satellite|mission)\s+(carries|has)\s+(\w+)", "carries"),
];

/// How many words to look past a verb for its subject or object.
const MAX_GAP: usize = 3;

pub struct PatternExtractor {
    patterns: Vec<(Regex, &'static str)>,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            patterns: RELATION_PATTERNS
                .iter()
                .map(|(pattern, relation)| {
                    (Regex::new(pattern).expect("Invalid regex pattern"), *relation)
                })
                .collect(),
        }
    }

    /// Apply every pattern in table order; matches within a pattern are
    /// non-overlapping and in text order.
    pub fn extract(&self, text: &str) -> Vec<ExtractedRelationship> {
        let mut relationships = Vec::new();

        for (regex, relation) in &self.patterns {
            for cap in regex.captures_iter(text) {
                let (Some(source), Some(target)) = (cap.get(1), cap.iter().last().flatten())
                else {
                    continue;
                };
                push_filtered(&mut relationships, source.as_str(), target.as_str(), relation);
            }
        }

        relationships
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Heuristic stand-in for a dependency parse: within each sentence, a known
/// verb takes the nearest preceding content word as subject and the nearest
/// following one as object. The relation is the verb lemma.
pub struct SvoMatcher {
    sentence_split: Regex,
    word: Regex,
}

impl SvoMatcher {
    pub fn new() -> Self {
        Self {
            sentence_split: Regex::new(r"[.!?;\n]+").expect("Invalid regex pattern"),
            word: Regex::new(r"\w+(?:[-']\w+)*").expect("Invalid regex pattern"),
        }
    }

    pub fn extract(&self, text: &str) -> Vec<ExtractedRelationship> {
        let mut relationships = Vec::new();

        for sentence in self.sentence_split.split(text) {
            let words: Vec<&str> = self.word.find_iter(sentence).map(|m| m.as_str()).collect();

            for (idx, word) in words.iter().enumerate() {
                let Some(lemma) = verb_lemma(word) else {
                    continue;
                };

                let subject = words[..idx]
                    .iter()
                    .rev()
                    .take(MAX_GAP)
                    .find(|w| is_content_word(w));
                let object = words[idx + 1..]
                    .iter()
                    .take(MAX_GAP)
                    .find(|w| is_content_word(w));

                if let (Some(subject), Some(object)) = (subject, object) {
                    push_filtered(&mut relationships, subject, object, lemma);
                }
            }
        }

        relationships
    }
}

impl Default for SvoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_content_word(word: &str) -> bool {
    !is_common_word(word)
        && verb_lemma(word).is_none()
        && !FILLER_WORDS.contains(&word.to_lowercase().as_str())
}

fn push_filtered(out: &mut Vec<ExtractedRelationship>, source: &str, target: &str, relation: &str) {
    let source = source.trim();
    let target = target.trim();
    if is_common_word(source) || is_common_word(target) {
        return;
    }
    out.push(ExtractedRelationship {
        source: source.to_string(),
        target: target.to_string(),
        relation: relation.to_string(),
    });
}
