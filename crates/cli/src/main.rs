//! # observatory-cli
//!
//! The composition root for the ingestion-and-retrieval pipeline: builds
//! the constructed-once handles (store, chat provider, vector index) from
//! environment configuration and exposes them as subcommands.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use observatory::{
    default_sources, AnswerEngine, ArticleStore, ArticleSynthesizer, ChatProvider,
    EmbeddingConfig, FeedFetcher, FetchOptions, IngestPipeline, VectorIndex,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one ingestion cycle and rebuild the index
    Ingest,
    /// Ask a question over the accumulated archive
    Ask(AskArgs),
    /// Run ingestion cycles on a timer
    Schedule,
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// The question to answer
    question: String,
    /// How many articles to retrieve as context
    #[arg(long)]
    top_k: Option<usize>,
}

/// The constructed-once handles shared by every command.
struct App {
    config: AppConfig,
    store: ArticleStore,
    index: VectorIndex,
}

async fn build_app(config: AppConfig) -> Result<App> {
    if let Some(parent) = std::path::Path::new(&config.db_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }

    let db = turso::Builder::new_local(&config.db_url)
        .build()
        .await
        .context("opening database")?;
    let store = ArticleStore::new(&db);
    store
        .initialize_schema()
        .await
        .context("initializing schema")?;

    let index = VectorIndex::new(
        &db,
        EmbeddingConfig {
            api_url: config.embeddings_api_url.clone(),
            model: config.embeddings_model.clone(),
            api_key: config.embeddings_api_key.clone(),
        },
    );

    Ok(App {
        config,
        store,
        index,
    })
}

fn build_pipeline(app: &App) -> Result<IngestPipeline> {
    let fetcher = FeedFetcher::new(FetchOptions {
        lookback_days: app.config.lookback_days,
        per_feed_limit: app.config.per_feed_limit,
    })
    .context("building feed fetcher")?;

    let provider = ChatProvider::new(
        app.config.ai_api_url.clone(),
        app.config.ai_api_key.clone(),
        app.config.ai_model.clone(),
    )
    .context("building chat provider")?;

    Ok(IngestPipeline::new(
        fetcher,
        ArticleSynthesizer::new(Box::new(provider)),
        app.store.clone(),
        app.index.clone(),
        default_sources(),
    ))
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let app = build_app(AppConfig::from_env()).await?;

    match cli.command {
        Commands::Ingest => {
            let pipeline = build_pipeline(&app)?;
            let report = pipeline.run_cycle().await;
            println!(
                "Cycle complete: {} fetched, {} duplicates skipped, {} persisted, {} failures, index rebuilt: {}",
                report.fetched,
                report.skipped_duplicates,
                report.persisted,
                report.failures,
                report.index_rebuilt
            );
        }
        Commands::Ask(args) => {
            let provider = ChatProvider::new(
                app.config.ai_api_url.clone(),
                app.config.ai_api_key.clone(),
                app.config.ai_model.clone(),
            )
            .context("building chat provider")?;
            let engine = AnswerEngine::new(
                Box::new(provider),
                app.index.clone(),
                app.store.clone(),
            );
            let top_k = args.top_k.unwrap_or(app.config.top_k);
            let result = engine.answer(&args.question, top_k).await?;
            println!("{}", result.answer);
            for (i, source) in result.sources.iter().enumerate() {
                println!("[{}] {} ({})", i + 1, source.title, source.category);
            }
        }
        Commands::Schedule => {
            run_scheduler(&app).await?;
        }
    }

    Ok(())
}

/// Runs an index rebuild at startup, then a cycle every configured
/// interval. A non-positive interval runs exactly one cycle.
async fn run_scheduler(app: &App) -> Result<()> {
    let pipeline = build_pipeline(app)?;

    // The index must mirror the store before any question is served.
    pipeline.rebuild_index().await;

    if app.config.schedule_interval_minutes <= 0 {
        info!("Scheduling disabled; running a single cycle");
        pipeline.run_cycle().await;
        return Ok(());
    }

    let period = Duration::from_secs(app.config.schedule_interval_minutes as u64 * 60);
    info!(
        interval_minutes = app.config.schedule_interval_minutes,
        "Scheduler started"
    );
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        pipeline.run_cycle().await;
    }
}
