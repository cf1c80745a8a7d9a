use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Hit/miss counters, logged at the end of a `satqa chat` session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// LRU cache for query embeddings
///
/// Remote embedding calls are the slowest part of a query; repeated questions
/// ("what is SST?") hit this cache instead. Keys are the trimmed query text.
pub struct EmbeddingCache {
    cache: Mutex<LruCache<String, Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    /// Create a new embedding cache holding at most `capacity` vectors (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up the embedding for `text`, promoting it in the LRU order.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let found = self
            .cache
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(text.trim()).cloned());

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store an embedding, evicting the least recently used entry when full.
    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(text.trim().to_string(), embedding);
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_put_and_get() {
        let cache = EmbeddingCache::new(10);
        cache.put("sea surface temperature", vec![1.0, 2.0, 3.0]);

        let retrieved = cache.get("sea surface temperature");
        assert_eq!(retrieved, Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_cache_key_is_trimmed() {
        let cache = EmbeddingCache::new(10);
        cache.put("  what is SST?\n", vec![0.5]);
        assert!(cache.get("what is SST?").is_some());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = EmbeddingCache::new(2);

        cache.put("query1", vec![1.0]);
        cache.put("query2", vec![2.0]);
        cache.put("query3", vec![3.0]);

        assert!(cache.get("query1").is_none()); // Evicted
        assert!(cache.get("query2").is_some());
        assert!(cache.get("query3").is_some());
    }

    #[test]
    fn test_cache_get_updates_lru() {
        let cache = EmbeddingCache::new(2);

        cache.put("query1", vec![1.0]);
        cache.put("query2", vec![2.0]);
        let _ = cache.get("query1");
        cache.put("query3", vec![3.0]);

        assert!(cache.get("query1").is_some());
        assert!(cache.get("query2").is_none()); // Evicted
    }

    #[test]
    fn test_cache_zero_capacity_holds_one() {
        let cache = EmbeddingCache::new(0);
        cache.put("a", vec![1.0]);
        cache.put("b", vec![2.0]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_stats_and_clear() {
        let cache = EmbeddingCache::new(4);
        cache.put("query1", vec![1.0]);
        let _ = cache.get("query1");
        let _ = cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
