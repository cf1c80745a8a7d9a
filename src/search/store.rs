//! JSON persistence for the vector index.
//!
//! File layout: `{"documents": {id: text}, "embeddings": {id: [f32]},
//! "metadata": {id: {...}}, "backend": name}`. `backend` is optional so
//! files written without it still load.

use crate::error::{Result, SatqaError};
use crate::search::{DocumentRecord, Metadata};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct PersistedIndex {
    #[serde(default)]
    pub documents: IndexMap<String, String>,
    #[serde(default)]
    pub embeddings: IndexMap<String, Vec<f32>>,
    #[serde(default)]
    pub metadata: IndexMap<String, Metadata>,
    /// Name of the backend that produced the embeddings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl PersistedIndex {
    pub fn from_records(records: &IndexMap<String, DocumentRecord>, backend: Option<String>) -> Self {
        let mut persisted = Self {
            backend,
            ..Self::default()
        };
        for (id, record) in records {
            persisted.documents.insert(id.clone(), record.text.clone());
            persisted.embeddings.insert(id.clone(), record.embedding.clone());
            if !record.metadata.is_empty() {
                persisted.metadata.insert(id.clone(), record.metadata.clone());
            }
        }
        persisted
    }

    /// Rebuild records, dropping documents without an embedding.
    ///
    /// Fails if the stored embeddings disagree on dimensionality.
    pub fn into_records(mut self) -> Result<IndexMap<String, DocumentRecord>> {
        let mut records = IndexMap::with_capacity(self.documents.len());
        let mut dimension: Option<usize> = None;

        for (id, text) in self.documents {
            let Some(embedding) = self.embeddings.swap_remove(&id) else {
                log::warn!("Skipping document {} without a stored embedding", id);
                continue;
            };

            match dimension {
                Some(dim) if dim != embedding.len() => {
                    return Err(SatqaError::Index(format!(
                        "Embedding dimension mismatch for {}: expected {}, got {}",
                        id,
                        dim,
                        embedding.len()
                    )));
                }
                None => dimension = Some(embedding.len()),
                _ => {}
            }

            let metadata = self.metadata.swap_remove(&id).unwrap_or_default();
            records.insert(
                id,
                DocumentRecord {
                    text,
                    embedding,
                    metadata,
                },
            );
        }

        Ok(records)
    }
}

pub(crate) fn write_index(path: &Path, persisted: &PersistedIndex) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, persisted)?;
    Ok(())
}

pub(crate) fn read_index(path: &Path) -> Result<PersistedIndex> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
