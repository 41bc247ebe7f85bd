//! coach-rag - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use coach_rag::{
    cli::{display, AnalyzeArgs, Args, Commands, SearchArgs},
    config::Config,
    generation::OllamaGenerator,
    rag::{FeedbackComposer, PineconeSearchClient, RetrievalOrchestrator, SearchBackend},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    init_tracing(args.verbosity().log_level(&config.logging.level));

    match &args.command {
        Commands::Analyze(analyze) => run_analyze(&config, analyze).await,
        Commands::Search(search) => run_search(&config, search).await,
        Commands::Config => show_config(&config),
    }
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_analyze(config: &Config, args: &AnalyzeArgs) -> Result<()> {
    let transcript = read_transcript(args)?;
    let request = args.to_request(transcript);

    let search = PineconeSearchClient::new(&config.search).context("Failed to build search client")?;
    let generator = OllamaGenerator::new(&config.generation).context("Failed to build generator")?;

    let orchestrator = RetrievalOrchestrator::with_config(Arc::new(search), &config.retrieval);
    let composer = FeedbackComposer::new(orchestrator, Arc::new(generator));

    let result = composer
        .compose_feedback(&request)
        .await
        .context("Coaching feedback failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", display::render_feedback(&result));
    }
    Ok(())
}

async fn run_search(config: &Config, args: &SearchArgs) -> Result<()> {
    let client = PineconeSearchClient::new(&config.search).context("Failed to build search client")?;

    let result = client
        .search(&args.text, args.top_k(), args.lang.as_deref(), None)
        .await
        .context("Search failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", display::render_hits(&result));
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if shown.search.api_key.is_some() {
        shown.search.api_key = Some("***".to_string());
    }
    let text = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    println!("{}", text);
    Ok(())
}

fn read_transcript(args: &AnalyzeArgs) -> Result<String> {
    match &args.transcript {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript from stdin")?;
            Ok(buffer)
        }
    }
}
