use crate::search::SearchHit;
use std::cmp::Ordering;

/// Score used when the query text occurs in the document and embeddings are unusable
pub const LEXICAL_HIT_SCORE: f32 = 0.5;
/// Score for every other document in lexical mode
pub const LEXICAL_MISS_SCORE: f32 = 0.1;

/// Compute cosine similarity between two vectors
///
/// # Returns
///
/// Cosine similarity in [-1, 1], 0.0 if either vector has zero magnitude,
/// or `None` when the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return Some(0.0);
    }

    Some(dot / (mag_a * mag_b))
}

/// Binary relevance signal for degraded mode: case-insensitive substring match.
pub fn lexical_score(query: &str, document: &str) -> f32 {
    if document.to_lowercase().contains(&query.to_lowercase()) {
        LEXICAL_HIT_SCORE
    } else {
        LEXICAL_MISS_SCORE
    }
}

/// Sort scored ids by score descending, ties by ascending id, and assign 1-based ranks.
pub fn rank(scored: Vec<(String, f32)>) -> Vec<SearchHit> {
    let mut scored = scored;
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (doc_id, score))| SearchHit {
            doc_id,
            score,
            rank: idx + 1,
        })
        .collect()
}

/// Keep the first `k` hits, renumbering ranks after any filtering.
pub fn take_ranked(hits: impl IntoIterator<Item = SearchHit>, k: usize) -> Vec<SearchHit> {
    hits.into_iter()
        .take(k)
        .enumerate()
        .map(|(idx, mut hit)| {
            hit.rank = idx + 1;
            hit
        })
        .collect()
}
