use crate::embeddings::EmbeddingBackend;
use crate::error::{Result, SatqaError};
use crate::search::store::{read_index, write_index, PersistedIndex};
use crate::search::vector::{cosine_similarity, lexical_score, rank, take_ranked};
use crate::search::{DocumentRecord, Metadata, SearchHit};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

/// Summary reported by `VectorIndex::stats`
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub embedding_dimension: usize,
    pub backend: String,
}

/// In-memory embedding index with exact (linear scan) cosine search.
///
/// Document ids are unique; re-adding an id replaces its text and embedding.
/// Without a backend the index is inert: adds are no-ops and searches return
/// nothing.
pub struct VectorIndex {
    backend: Option<EmbeddingBackend>,
    documents: IndexMap<String, DocumentRecord>,
}

impl VectorIndex {
    pub fn new(backend: Option<EmbeddingBackend>) -> Self {
        if backend.is_none() {
            log::warn!("No embedding model available; vector index runs disabled");
        }
        Self {
            backend,
            documents: IndexMap::new(),
        }
    }

    /// Capability flag checked before every embedding call.
    pub fn embedding_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&EmbeddingBackend> {
        self.backend.as_ref()
    }

    /// Embed and store a document, replacing any prior entry for `doc_id`.
    ///
    /// Metadata is only replaced when provided. Empty text and a missing
    /// backend are no-ops.
    pub async fn add_document(
        &mut self,
        doc_id: &str,
        text: &str,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        let Some(backend) = self.backend.as_ref() else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        let mut embeddings = backend.embed_batch(&[text.to_string()]).await?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| SatqaError::Embedding(format!("No embedding returned for {}", doc_id)))?;
        check_dimension(backend, doc_id, &embedding)?;

        let metadata = match (metadata, self.documents.get(doc_id)) {
            (Some(metadata), _) => metadata,
            (None, Some(existing)) => existing.metadata.clone(),
            (None, None) => Metadata::new(),
        };

        self.documents.insert(
            doc_id.to_string(),
            DocumentRecord {
                text: text.to_string(),
                embedding,
                metadata,
            },
        );
        Ok(())
    }

    /// Add many documents with a single embedding pass. Entries with empty
    /// text are skipped. Returns the number of documents stored.
    pub async fn batch_add_documents(
        &mut self,
        documents: Vec<(String, String, Option<Metadata>)>,
    ) -> Result<usize> {
        let Some(backend) = self.backend.as_ref() else {
            return Ok(0);
        };

        let documents: Vec<_> = documents
            .into_iter()
            .filter(|(_, text, _)| !text.is_empty())
            .collect();
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|(_, text, _)| text.clone()).collect();
        let embeddings = backend.embed_batch(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(SatqaError::Embedding(format!(
                "Expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }
        for ((doc_id, _, _), embedding) in documents.iter().zip(embeddings.iter()) {
            check_dimension(backend, doc_id, embedding)?;
        }

        let count = documents.len();
        for ((doc_id, text, metadata), embedding) in documents.into_iter().zip(embeddings) {
            self.documents.insert(
                doc_id,
                DocumentRecord {
                    text,
                    embedding,
                    metadata: metadata.unwrap_or_default(),
                },
            );
        }
        log::debug!("Batch-indexed {} documents", count);
        Ok(count)
    }

    /// Top `top_k` documents by cosine similarity to `query`.
    ///
    /// Never fails: an empty query, an empty index or a missing backend
    /// yield an empty list.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        take_ranked(self.rank_all(query).await, top_k)
    }

    /// Rank everything, keep documents whose metadata contains every filter
    /// pair (exact match), then truncate. Filtering never alters scores.
    pub async fn semantic_search_with_filters(
        &self,
        query: &str,
        filters: &Metadata,
        top_k: usize,
    ) -> Vec<SearchHit> {
        let ranked = self.rank_all(query).await;
        let filtered = ranked.into_iter().filter(|hit| {
            self.documents
                .get(&hit.doc_id)
                .map(|record| {
                    filters
                        .iter()
                        .all(|(key, value)| record.metadata.get(key) == Some(value))
                })
                .unwrap_or(false)
        });
        take_ranked(filtered, top_k)
    }

    /// Documents most similar to `doc_id`, never including `doc_id` itself.
    pub async fn get_similar_documents(&self, doc_id: &str, top_k: usize) -> Vec<SearchHit> {
        let Some(record) = self.documents.get(doc_id) else {
            return Vec::new();
        };
        let hits = self.search(&record.text, top_k.saturating_add(1)).await;
        take_ranked(hits.into_iter().filter(|hit| hit.doc_id != doc_id), top_k)
    }

    async fn rank_all(&self, query: &str) -> Vec<SearchHit> {
        let Some(backend) = self.backend.as_ref() else {
            return Vec::new();
        };
        if query.is_empty() || self.documents.is_empty() {
            return Vec::new();
        }

        let scored: Vec<(String, f32)> = match backend.embed_query(query).await {
            Ok(query_vec) => self
                .documents
                .iter()
                .filter_map(|(id, record)| {
                    cosine_similarity(&query_vec, &record.embedding).map(|s| (id.clone(), s))
                })
                .collect(),
            Err(e) => {
                log::warn!("Query embedding failed ({}); falling back to substring scoring", e);
                self.documents
                    .iter()
                    .map(|(id, record)| (id.clone(), lexical_score(query, &record.text)))
                    .collect()
            }
        };

        rank(scored)
    }

    /// Replace an existing document; unknown ids are ignored.
    pub async fn update_document(
        &mut self,
        doc_id: &str,
        text: &str,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        if self.documents.contains_key(doc_id) {
            self.add_document(doc_id, text, metadata).await?;
        }
        Ok(())
    }

    pub fn remove_document(&mut self, doc_id: &str) -> Option<DocumentRecord> {
        self.documents.shift_remove(doc_id)
    }

    pub fn get_document(&self, doc_id: &str) -> Option<&str> {
        self.documents.get(doc_id).map(|r| r.text.as_str())
    }

    pub fn get_metadata(&self, doc_id: &str) -> Option<&Metadata> {
        self.documents.get(doc_id).map(|r| &r.metadata)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.documents.contains_key(doc_id)
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.documents.len(),
            embedding_dimension: self
                .documents
                .values()
                .next()
                .map(|r| r.embedding.len())
                .unwrap_or(0),
            backend: self
                .backend
                .as_ref()
                .map(|b| b.name())
                .unwrap_or_else(|| "none".to_string()),
        }
    }

    /// Persist documents, embeddings, metadata and the backend name as JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let backend = self.backend.as_ref().map(|b| b.name());
        write_index(path, &PersistedIndex::from_records(&self.documents, backend))?;
        log::info!("Saved {} documents to {}", self.documents.len(), path.display());
        Ok(())
    }

    /// Replace the in-memory state with the file's contents.
    ///
    /// Returns `Ok(false)` and leaves the index untouched when the file does
    /// not exist. Fails with `SatqaError::Index`, again leaving the index
    /// untouched, when the file was written by a different backend or its
    /// vectors do not match the backend's dimension; the caller re-embeds.
    pub fn load_from_file(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            log::debug!("No index file at {}", path.display());
            return Ok(false);
        }

        let persisted = read_index(path)?;
        if let (Some(backend), Some(stored)) = (self.backend.as_ref(), persisted.backend.as_deref()) {
            if stored != backend.name() {
                return Err(SatqaError::Index(format!(
                    "{} was built with {} but the current backend is {}",
                    path.display(),
                    stored,
                    backend.name()
                )));
            }
        }

        let records = persisted.into_records()?;
        if let (Some(backend), Some((doc_id, record))) = (self.backend.as_ref(), records.first()) {
            check_dimension(backend, doc_id, &record.embedding)?;
        }

        self.documents = records;
        log::info!("Loaded {} documents from {}", self.documents.len(), path.display());
        Ok(true)
    }
}

fn check_dimension(backend: &EmbeddingBackend, doc_id: &str, embedding: &[f32]) -> Result<()> {
    if embedding.len() != backend.dimension() {
        return Err(SatqaError::Index(format!(
            "Unexpected embedding dimension for {}: expected {}, got {}",
            doc_id,
            backend.dimension(),
            embedding.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;
    use serde_json::json;
    use tempfile::TempDir;

    fn hashing_index() -> VectorIndex {
        VectorIndex::new(Some(EmbeddingBackend::Hashing(HashingEmbedder::new(256))))
    }

    async fn seeded_index() -> VectorIndex {
        let mut index = hashing_index();
        let docs = vec![
            ("SST", "SST PRODUCT Sea Surface Temperature data", "ocean"),
            ("Chlorophyll", "Chlorophyll PRODUCT Ocean chlorophyll concentration data", "ocean"),
            ("Land_Cover", "Land_Cover PRODUCT Land cover classification data", "land"),
            ("User_Registration", "User_Registration SERVICE User account management", "portal"),
        ];
        for (id, text, domain) in docs {
            let mut metadata = Metadata::new();
            metadata.insert("domain".to_string(), json!(domain));
            index.add_document(id, text, Some(metadata)).await.unwrap();
        }
        index
    }

    #[tokio::test]
    async fn test_add_document_empty_text_is_noop() {
        let mut index = hashing_index();
        index.add_document("empty", "", None).await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_add_document_without_backend_is_noop() {
        let mut index = VectorIndex::new(None);
        assert!(!index.embedding_available());
        index.add_document("SST", "Sea Surface Temperature", None).await.unwrap();
        assert!(index.is_empty());
        assert!(index.search("Sea Surface Temperature", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_document_replaces_and_keeps_metadata() {
        let mut index = seeded_index().await;
        index
            .add_document("SST", "SST PRODUCT sea surface temperature anomalies", None)
            .await
            .unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(
            index.get_document("SST"),
            Some("SST PRODUCT sea surface temperature anomalies")
        );
        assert_eq!(index.get_metadata("SST").unwrap()["domain"], json!("ocean"));
    }

    #[tokio::test]
    async fn test_search_ranks_best_match_first() {
        let index = seeded_index().await;
        let hits = index.search("Sea Surface Temperature", 3).await;
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].doc_id, "SST");
        assert_eq!(hits[0].rank, 1);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_search_empty_query_and_empty_index() {
        let index = seeded_index().await;
        assert!(index.search("", 5).await.is_empty());
        assert!(hashing_index().search("SST", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_add_skips_empty_text() {
        let mut index = hashing_index();
        let added = index
            .batch_add_documents(vec![
                ("INSAT".into(), "INSAT SATELLITE Indian National Satellite System".into(), None),
                ("blank".into(), String::new(), None),
                ("SST".into(), "SST PRODUCT Sea Surface Temperature data".into(), None),
            ])
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert!(!index.contains("blank"));
        assert_eq!(index.document_ids().collect::<Vec<_>>(), vec!["INSAT", "SST"]);
    }

    #[tokio::test]
    async fn test_filters_apply_after_ranking() {
        let index = seeded_index().await;
        let mut filters = Metadata::new();
        filters.insert("domain".to_string(), json!("ocean"));

        let hits = index.semantic_search_with_filters("ocean data", &filters, 5).await;
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.doc_id == "SST" || h.doc_id == "Chlorophyll"));
        assert_eq!(hits[0].rank, 1);

        let unfiltered = index.search("ocean data", 10).await;
        for hit in &hits {
            let same = unfiltered.iter().find(|u| u.doc_id == hit.doc_id).unwrap();
            assert_eq!(same.score, hit.score);
        }
    }

    #[tokio::test]
    async fn test_similar_documents_exclude_self() {
        let index = seeded_index().await;
        let similar = index.get_similar_documents("Chlorophyll", 3).await;
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|h| h.doc_id != "Chlorophyll"));
        assert!(index.get_similar_documents("missing", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let mut index = seeded_index().await;
        index.update_document("unknown", "text", None).await.unwrap();
        assert!(!index.contains("unknown"));

        assert!(index.remove_document("Land_Cover").is_some());
        assert_eq!(index.len(), 3);
        index.clear();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip_preserves_rankings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vectors.json");

        let index = seeded_index().await;
        let before = index.search("ocean chlorophyll", 4).await;
        index.save_to_file(&path).unwrap();

        let mut restored = hashing_index();
        assert!(restored.load_from_file(&path).unwrap());
        let after = restored.search("ocean chlorophyll", 4).await;

        assert_eq!(before, after);
        assert_eq!(restored.get_metadata("SST").unwrap()["domain"], json!("ocean"));
    }

    #[tokio::test]
    async fn test_load_replaces_instead_of_merging() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vectors.json");
        seeded_index().await.save_to_file(&path).unwrap();

        let mut other = hashing_index();
        other.add_document("Bathymetry", "Bathymetry PRODUCT Ocean depth measurements", None).await.unwrap();
        other.load_from_file(&path).unwrap();
        assert!(!other.contains("Bathymetry"));
        assert_eq!(other.len(), 4);
    }

    #[tokio::test]
    async fn test_load_rejects_other_backend_and_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vectors.json");
        seeded_index().await.save_to_file(&path).unwrap();

        let mut narrow = VectorIndex::new(Some(EmbeddingBackend::Hashing(HashingEmbedder::new(64))));
        narrow.add_document("SST", "SST PRODUCT Sea Surface Temperature data", None).await.unwrap();

        let err = narrow.load_from_file(&path).unwrap_err();
        assert!(matches!(err, SatqaError::Index(_)));
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow.stats().embedding_dimension, 64);
        assert_eq!(narrow.search("Sea Surface Temperature", 1).await[0].doc_id, "SST");
    }

    #[tokio::test]
    async fn test_load_rejects_wrong_dimension_without_backend_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vectors.json");
        seeded_index().await.save_to_file(&path).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        raw.as_object_mut().unwrap().remove("backend");
        std::fs::write(&path, raw.to_string()).unwrap();

        let mut narrow = VectorIndex::new(Some(EmbeddingBackend::Hashing(HashingEmbedder::new(64))));
        assert!(narrow.load_from_file(&path).is_err());
        assert!(narrow.is_empty());

        let mut same = hashing_index();
        assert!(same.load_from_file(&path).unwrap());
        assert_eq!(same.len(), 4);
    }

    #[tokio::test]
    async fn test_similar_documents_with_huge_k() {
        let index = seeded_index().await;
        let similar = index.get_similar_documents("SST", usize::MAX).await;
        assert_eq!(similar.len(), 3);
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let mut index = hashing_index();
        let loaded = index.load_from_file(Path::new("/nonexistent/vectors.json")).unwrap();
        assert!(!loaded);
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let index = seeded_index().await;
        let stats = index.stats();
        assert_eq!(stats.total_documents, 4);
        assert_eq!(stats.embedding_dimension, 256);
        assert_eq!(stats.backend, "hashing-sha256:256");
        assert_eq!(VectorIndex::new(None).stats().backend, "none");
    }
}
