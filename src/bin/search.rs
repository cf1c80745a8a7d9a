use anyhow::Result;
use clap::Parser;
use satqa::search::{Metadata, SearchHit};
use satqa::state::open_knowledge_graph;
use satqa::{Config, EntityType};
use serde_json::json;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "search")]
#[command(about = "Semantic search over knowledge graph entities")]
struct Args {
    /// Free-text query
    #[arg(required_unless_present = "similar")]
    query: Option<String>,

    /// Number of results
    #[arg(short = 'k', long, default_value_t = 5)]
    top_k: usize,

    /// Restrict to one entity type, e.g. SATELLITE or PRODUCT
    #[arg(short = 't', long = "type")]
    entity_type: Option<EntityType>,

    /// List entities similar to this entity id instead of running a query
    #[arg(long, conflicts_with = "query")]
    similar: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "warn"),
    )
    .init();

    let (graph, _) = open_knowledge_graph(&config).await?;
    if !graph.index().embedding_available() {
        anyhow::bail!("No embedding backend configured; set embeddings.provider in config.toml");
    }

    let start = Instant::now();
    let hits: Vec<SearchHit> = match (&args.similar, &args.query) {
        (Some(entity), _) => graph.index().get_similar_documents(entity, args.top_k).await,
        (None, Some(query)) => match args.entity_type {
            Some(entity_type) => {
                let mut filters = Metadata::new();
                filters.insert("type".to_string(), json!(entity_type.as_str()));
                graph
                    .index()
                    .semantic_search_with_filters(query, &filters, args.top_k)
                    .await
            }
            None => graph.index().search(query, args.top_k).await,
        },
        (None, None) => anyhow::bail!("Provide a query or --similar <entity>"),
    };
    let elapsed = start.elapsed();

    println!("\n=== Search Results ({} in {:?}) ===\n", hits.len(), elapsed);
    if hits.is_empty() {
        println!("No matching entities.");
        return Ok(());
    }

    for hit in &hits {
        let entity_type = graph
            .entity_type(&hit.doc_id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>2}. {:<24} {:<12} {:.4}", hit.rank, hit.doc_id, entity_type, hit.score);

        let related = graph.find_related_entities(&hit.doc_id);
        if !related.is_empty() {
            let names: Vec<String> = related
                .iter()
                .take(3)
                .map(|r| format!("{} ({})", r.entity, r.relation))
                .collect();
            println!("    related: {}", names.join(", "));
        }
    }
    println!();

    Ok(())
}
