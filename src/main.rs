//! Catdex: scrape-and-search service for cat content

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catdex::config::{Config, LogFormat, LoggingConfig};
use catdex::http::{AppState, HttpServer};
use catdex::sources;

#[derive(Parser)]
#[command(name = "catdex")]
#[command(about = "Scrape-and-search service for cat content")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen address override (e.g. "0.0.0.0:5000")
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Run one source's ingestion pipeline and rebuild its index
    Ingest {
        /// Source key (see `catdex sources`)
        source: String,
    },

    /// Query an index from the command line
    Search {
        /// Query text
        query: String,

        /// Source key whose index to query
        #[arg(short, long, default_value = "articles")]
        source: String,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the configured scrape sources
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    init_tracing(&config.logging, cli.verbose);

    match cli.command {
        Commands::Serve { listen } => {
            if let Some(listen) = listen {
                config.http.listen_addr = listen;
            }
            let http_config = config.http.clone();
            let state = AppState::from_config(config)?;
            HttpServer::new(http_config, state).run().await?;
        }

        Commands::Ingest { source } => {
            let Some(source) = sources::by_key(&source) else {
                anyhow::bail!(
                    "Unknown source '{}'. Valid sources: {}",
                    source,
                    sources::SOURCE_KEYS.join(", ")
                );
            };
            let state = AppState::from_config(config)?;
            let report = state.pipeline.run(&source).await?;
            info!(
                "Ingested '{}': {} documents indexed, {} failed",
                source.key, report.success_count, report.error_count
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Search {
            query,
            source,
            limit,
        } => {
            let Some(source) = sources::by_key(&source) else {
                anyhow::bail!(
                    "Unknown source '{}'. Valid sources: {}",
                    source,
                    sources::SOURCE_KEYS.join(", ")
                );
            };
            let state = AppState::from_config(config)?;
            let results = state.query.search(source.index_name, &query, limit)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }

        Commands::Sources => {
            let summaries: Vec<sources::SourceSummary> =
                sources::builtin().iter().map(Into::into).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber from the logging config, with `-v`
/// flags raising verbosity above the configured level.
fn init_tracing(config: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
