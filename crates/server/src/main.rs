//! Newschat server
//!
//! HTTP service answering questions about a news archive with
//! retrieval-augmented, citation-grounded streaming responses.

mod app;
mod encoding;
mod error;
mod handlers;
mod state;

use clap::Parser;
use newschat_chat::ChatPipeline;
use newschat_core::{config::AppConfig, logging, AppError, AppResult};
use newschat_index::PineconeIndex;
use newschat_llm::create_client;
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Newschat - retrieval-augmented chat over a news archive
#[derive(Parser, Debug)]
#[command(name = "newschat")]
#[command(about = "Retrieval-augmented chat over a news archive", long_about = None)]
#[command(version)]
struct Cli {
    /// Socket address to bind the HTTP server to
    #[arg(short, long, env = "NEWSCHAT_BIND")]
    bind: Option<String>,

    /// Path to config file
    #[arg(short, long, env = "NEWSCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment, then apply CLI overrides
    let config = AppConfig::load()?.with_overrides(
        cli.bind,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("Newschat server starting");
    tracing::debug!("Search index: {} ({})", config.search.index, config.search.host);
    tracing::debug!("LLM endpoint: {}", config.llm.endpoint);

    let llm = create_client(
        "deepseek",
        Some(&config.llm.endpoint),
        config.llm.api_key.as_deref(),
    )
    .map_err(AppError::Config)?;

    let search_key = config
        .search
        .api_key
        .clone()
        .ok_or_else(|| AppError::Config("PINECONE_API_KEY is required".to_string()))?;

    let index = Arc::new(PineconeIndex::new(
        &config.search.host,
        &config.search.index,
        &config.search.namespace,
        search_key,
    ));

    let pipeline = ChatPipeline::new(llm, index);
    let state = Arc::new(AppState::new(
        pipeline,
        Duration::from_secs(config.request_budget_secs),
    ));

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
