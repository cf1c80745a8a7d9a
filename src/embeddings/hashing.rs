//! Deterministic feature-hashing embedder for offline use and tests.
//!
//! Buckets come from SHA-256, whose output is fixed, so vectors persisted by
//! one build keep matching queries embedded by another.

use sha2::{Digest, Sha256};

/// Bag-of-words embedding: every lowercased alphanumeric token is hashed
/// into one of `dim` buckets, then the vector is L2-normalised so cosine
/// similarity reduces to a dot product.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vec[bucket(&token.to_lowercase(), self.dim)] += 1.0;
        }

        normalize(&mut vec);
        vec
    }
}

/// First eight digest bytes, little-endian, modulo `dim`.
fn bucket(token: &str, dim: usize) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_le_bytes(prefix) % dim as u64) as usize
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vec.iter_mut().for_each(|v| *v /= norm);
    }
}
