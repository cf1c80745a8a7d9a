use anyhow::Result;
use clap::Parser;
use satqa::state::open_knowledge_graph;
use satqa::Config;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Knowledge graph and vector index statistics")]
struct Args {
    /// Also walk the graph from this entity
    #[arg(long)]
    from: Option<String>,

    /// Traversal depth for --from
    #[arg(long, default_value_t = 2)]
    depth: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "warn"),
    )
    .init();

    let (graph, origin) = open_knowledge_graph(&config).await?;

    println!("\n=== SatQA Knowledge Graph Statistics ===\n");
    println!("Source: {:?} ({})", origin, config.graph_path().display());
    println!("Entities: {}", graph.get_entity_count());
    println!("Relationships: {}", graph.get_relationship_count());

    println!("\nEntities by type:\n");
    println!("{:-<40}", "");
    println!("{:<20} {:>8}", "Type", "Count");
    println!("{:-<40}", "");
    for (entity_type, count) in graph.type_counts() {
        println!("{:<20} {:>8}", entity_type, count);
    }
    println!("{:-<40}", "");

    let index_stats = graph.index().stats();
    println!("\nVector Index:");
    println!("  Documents: {}", index_stats.total_documents);
    println!("  Dimension: {}", index_stats.embedding_dimension);
    println!("  Backend: {}", index_stats.backend);

    if let Some(start) = &args.from {
        let steps = graph.traverse(start, args.depth, None);
        println!("\nTraversal from {} (depth {}):\n", start, args.depth);
        if steps.is_empty() {
            println!("  No outgoing relationships.");
        }
        for step in steps {
            println!(
                "  {}{} --{}--> {}",
                "  ".repeat(step.depth.saturating_sub(1)),
                step.source,
                step.relation,
                step.target
            );
        }
    }

    println!();
    Ok(())
}
