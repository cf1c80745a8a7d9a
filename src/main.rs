use anyhow::Result;
use clap::{Parser, Subcommand};
use satqa::llm::ChatClient;
use satqa::state::open_knowledge_graph;
use satqa::{Assistant, Config, KnowledgeGraph, Response, TextAnalyzer};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "satqa")]
#[command(version)]
#[command(about = "Question answering over the MOSDAC knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a single question
    Ask {
        question: String,

        /// Print the full response (analysis, results, context) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session; /clear, /summary and /quit are recognised
    Chat,
    /// Show everything known about one entity
    Entity { id: String },
    /// Write the graph as JSON to a file, or stdout
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.satqa.log_level.as_str()),
    )
    .init();

    log::info!("Starting SatQA v{}", env!("CARGO_PKG_VERSION"));
    let (graph, origin) = open_knowledge_graph(&config).await?;
    log::debug!("Graph origin: {:?}", origin);

    match cli.command {
        Command::Ask { question, json } => {
            let mut assistant = build_assistant(&config)?;
            let response = assistant.respond(&question, &graph).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_response(&response);
            }
        }
        Command::Chat => {
            let mut assistant = build_assistant(&config)?;
            run_chat(&mut assistant, &graph).await?;
            log_cache_stats(&graph);
        }
        Command::Entity { id } => match satqa::assistant::resolve_entity(&graph, &id) {
            Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
            None => anyhow::bail!("Entity not found: {}", id),
        },
        Command::Export { output } => {
            let snapshot = graph.export_graph_data();
            match output {
                Some(path) => {
                    snapshot.write(&path)?;
                    log::info!("Exported graph to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
        }
    }

    Ok(())
}

fn build_assistant(config: &Config) -> Result<Assistant> {
    let analyzer = TextAnalyzer::new(&config.analyzer);
    let chat = ChatClient::from_config(&config.llm)?;
    if chat.is_none() {
        log::info!("Chat model disabled; answering from the knowledge graph only");
    }
    Ok(Assistant::new(analyzer, chat, config.retrieval.clone()))
}

/// The query-embedding cache lives for one process, so it is reported at the
/// end of an interactive session.
fn log_cache_stats(graph: &KnowledgeGraph) {
    if let Some(cache) = graph.index().backend().and_then(|b| b.cache()) {
        let stats = cache.stats();
        log::info!(
            "Query embedding cache: {} entries, {} hits, {} misses",
            stats.entries,
            stats.hits,
            stats.misses
        );
    }
}

fn print_response(response: &Response) {
    println!("{}", response.text);
    if response.degraded {
        log::debug!("Answer produced without the chat model");
    }
    if !response.results.is_empty() {
        println!("\nSources:");
        for result in &response.results {
            println!("  - {} ({}, score {:.3})", result.entity, result.entity_type, result.score);
        }
    }
}

async fn run_chat(assistant: &mut Assistant, graph: &KnowledgeGraph) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("SatQA interactive session. Type /quit to exit.");
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                assistant.clear_history();
                println!("History cleared.");
            }
            "/summary" => {
                println!("{}", serde_json::to_string_pretty(&assistant.conversation_summary())?);
            }
            _ => {
                let response = assistant.respond(query, graph).await;
                print_response(&response);
            }
        }
    }

    Ok(())
}
