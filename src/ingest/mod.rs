//! Loading scraped-page records into the knowledge graph.

pub mod record;
pub mod walker;

pub use record::{load_records, ContentRecord, PageLink, RecordBatch};
pub use walker::{discover_record_files, RecordFile};

use crate::error::Result;
use crate::graph::KnowledgeGraph;
use crate::nlp::TextAnalyzer;
use serde::Serialize;
use std::path::Path;

/// Totals for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub failed_files: usize,
    pub records: usize,
    /// Entries inside readable files that failed to parse
    pub failed_records: usize,
    /// Records with no text
    pub skipped_records: usize,
    pub entities: usize,
    pub relationships: usize,
}

/// Feed records to the graph one by one. Records without text are skipped.
pub async fn ingest_records(
    graph: &mut KnowledgeGraph,
    analyzer: &TextAnalyzer,
    records: &[ContentRecord],
    report: &mut IngestReport,
) {
    for record in records {
        if record.text.trim().is_empty() {
            log::debug!(
                "Skipping record without text: {}",
                record.url.as_deref().unwrap_or("<no url>")
            );
            report.skipped_records += 1;
            continue;
        }

        let counts = graph.add_content(record, analyzer).await;
        report.records += 1;
        report.entities += counts.entities;
        report.relationships += counts.relationships;
    }
}

/// Discover record files under `root` and ingest each of them.
///
/// A file that cannot be read or parsed is logged and counted; the remaining
/// files are still processed. Within a file, a malformed record is counted in
/// `failed_records` and its neighbours are still ingested.
pub async fn ingest_path(
    graph: &mut KnowledgeGraph,
    analyzer: &TextAnalyzer,
    root: &Path,
) -> Result<IngestReport> {
    let files = discover_record_files(root)?;
    let mut report = IngestReport::default();

    for file in &files {
        report.files += 1;
        match load_records(&file.absolute_path) {
            Ok(batch) => {
                log::info!(
                    "Ingesting {} records from {} ({} unreadable)",
                    batch.records.len(),
                    file.relative_path,
                    batch.failures.len()
                );
                report.failed_records += batch.failures.len();
                ingest_records(graph, analyzer, &batch.records, &mut report).await;
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", file.relative_path, e);
                report.failed_files += 1;
            }
        }
    }

    log::info!(
        "Ingestion complete: {} records ({} unreadable) from {} files ({} failed), {} entities, {} relationships",
        report.records,
        report.failed_records,
        report.files,
        report.failed_files,
        report.entities,
        report.relationships
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingBackend, HashingEmbedder};
    use crate::search::VectorIndex;
    use std::fs;
    use tempfile::TempDir;

    fn hashing_graph() -> KnowledgeGraph {
        KnowledgeGraph::new(VectorIndex::new(Some(EmbeddingBackend::Hashing(
            HashingEmbedder::new(128),
        ))))
    }

    #[tokio::test]
    async fn test_bad_file_does_not_stop_ingestion() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a_broken.json"), "{not json").unwrap();
        fs::write(
            root.join("b_pages.jsonl"),
            concat!(
                "{\"url\": \"https://www.mosdac.gov.in/scatsat\", \"text\": \"SCATSAT measures Wind Speed\"}\n",
                "{\"url\": \"https://www.mosdac.gov.in/empty\", \"text\": \"   \"}\n",
            ),
        )
        .unwrap();

        let mut graph = hashing_graph();
        let report = ingest_path(&mut graph, &TextAnalyzer::default(), root)
            .await
            .unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.failed_files, 1);
        assert_eq!(report.records, 1);
        assert_eq!(report.skipped_records, 1);
        assert!(report.entities >= 2);
        assert!(graph.contains_entity("SCATSAT"));
        assert!(graph.contains_entity("Wind_Speed"));
    }

    #[tokio::test]
    async fn test_broken_line_keeps_rest_of_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("pages.jsonl"),
            concat!(
                "{\"url\": \"https://www.mosdac.gov.in/scatsat\", \"text\": \"SCATSAT measures Wind Speed\"}\n",
                "{broken\n",
                "{\"url\": \"https://www.mosdac.gov.in/oceansat\", \"text\": \"OCEANSAT monitors Chlorophyll\"}\n",
            ),
        )
        .unwrap();

        let mut graph = hashing_graph();
        let report = ingest_path(&mut graph, &TextAnalyzer::default(), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.files, 1);
        assert_eq!(report.failed_files, 0);
        assert_eq!(report.failed_records, 1);
        assert_eq!(report.records, 2);
        assert!(graph.contains_entity("SCATSAT"));
        assert!(graph.contains_entity("OCEANSAT"));
    }

    #[tokio::test]
    async fn test_ingest_records_accumulates() {
        let mut graph = hashing_graph();
        let analyzer = TextAnalyzer::default();
        let records = vec![
            ContentRecord {
                text: "OCEANSAT monitors Chlorophyll".into(),
                ..Default::default()
            },
            ContentRecord {
                text: "Bathymetry products are available as GeoTIFF".into(),
                ..Default::default()
            },
        ];

        let mut report = IngestReport::default();
        ingest_records(&mut graph, &analyzer, &records, &mut report).await;

        assert_eq!(report.records, 2);
        assert!(graph.contains_entity("GeoTIFF"));
        assert!(graph
            .find_related_entities("OCEANSAT")
            .iter()
            .any(|r| r.entity == "Chlorophyll" && r.relation == "monitors"));
    }
}
