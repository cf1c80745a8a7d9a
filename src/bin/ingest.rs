use anyhow::Result;
use clap::Parser;
use satqa::ingest::ingest_path;
use satqa::state::{open_knowledge_graph, save_knowledge_graph};
use satqa::{Config, TextAnalyzer};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Extract entities and relationships from scraped MOSDAC pages into the knowledge graph")]
struct Args {
    /// A .json/.jsonl record file or a directory of them
    path: PathBuf,

    /// Parse and extract without writing the graph back to disk
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.satqa.log_level.as_str()),
    )
    .init();

    log::info!("Starting SatQA ingestion from {}", args.path.display());
    log::info!("Data directory: {}", config.satqa.data_dir.display());

    let (mut graph, _) = open_knowledge_graph(&config).await?;
    let analyzer = TextAnalyzer::new(&config.analyzer);
    let entities_before = graph.get_entity_count();
    let relationships_before = graph.get_relationship_count();

    let start = Instant::now();
    let report = ingest_path(&mut graph, &analyzer, &args.path).await?;
    let elapsed = start.elapsed();

    if report.files == 0 {
        log::warn!("No .json or .jsonl record files found under {}", args.path.display());
        return Ok(());
    }

    log::info!("=== Ingestion Complete ===");
    log::info!("Files: {} ({} failed)", report.files, report.failed_files);
    log::info!(
        "Records ingested: {} (unreadable: {}, skipped without text: {})",
        report.records,
        report.failed_records,
        report.skipped_records
    );
    log::info!("Entities extracted: {}", report.entities);
    log::info!("Relationships extracted: {}", report.relationships);
    log::info!(
        "Graph size: {} -> {} entities, {} -> {} relationships",
        entities_before,
        graph.get_entity_count(),
        relationships_before,
        graph.get_relationship_count()
    );
    log::info!("Time: {:?}", elapsed);

    if report.failed_files > 0 || report.failed_records > 0 {
        log::warn!("Some files or records failed to load. Check logs above for details.");
    }

    if args.dry_run {
        log::info!("Dry run: graph not saved");
    } else {
        save_knowledge_graph(&graph, &config)?;
    }

    Ok(())
}
