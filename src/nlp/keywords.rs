use crate::nlp::gazetteer::{is_stopword, verb_lemma};
use indexmap::IndexMap;

const INVARIANT: &[&str] = &["series", "species", "news", "physics", "mathematics"];

/// Reduce a lowercased word to a crude lemma (plural and third-person forms).
pub fn lemmatize(word: &str) -> String {
    if INVARIANT.contains(&word) {
        return word.to_string();
    }
    let len = word.len();
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("sses") {
        return word[..len - 2].to_string();
    }
    if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..len - 1].to_string();
    }
    word.to_string()
}

fn is_candidate(word: &str) -> bool {
    word.chars().count() > 2
        && word.chars().all(|c| c.is_alphabetic() || c == '-')
        && !is_stopword(word)
        && verb_lemma(word).is_none()
}

/// Most frequent content lemmas, ties broken by first occurrence.
pub fn top_keywords<'a>(words: impl IntoIterator<Item = &'a str>, max_keywords: usize) -> Vec<String> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for word in words {
        let lower = word.to_lowercase();
        if !is_candidate(&lower) {
            continue;
        }
        *counts.entry(lemmatize(&lower)).or_insert(0) += 1;
    }

    let mut ranked: Vec<(usize, String, usize)> = counts
        .into_iter()
        .enumerate()
        .map(|(order, (lemma, count))| (order, lemma, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(max_keywords)
        .map(|(_, lemma, _)| lemma)
        .collect()
}
