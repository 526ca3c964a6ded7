use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelfwise_retrieval::RetrievalConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "shelfwise")]
#[command(about = "Build, inspect and query the book recommendation index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed book records and rebuild the collection from scratch
    BuildIndex {
        /// JSON array of {"title", "summary"} records
        #[arg(long)]
        records: PathBuf,
    },
    /// Show what the index holds and run sample queries against it
    Inspect {
        /// Show up to N titles as a quick preview
        #[arg(long, default_value_t = 5)]
        show: usize,
        /// Results per query (defaults to TOP_K)
        #[arg(long)]
        k: Option<usize>,
        /// Query to run (repeatable)
        #[arg(long = "query")]
        queries: Vec<String>,
    },
    /// Print the full summary for an exact title
    Summary {
        title: String,
        /// Look titles up in this records file instead of the index
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Print the function-tool schemas as JSON
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::BuildIndex { records } => {
            commands::build_index(&RetrievalConfig::from_env()?, &records).await
        }
        Commands::Inspect { show, k, queries } => {
            commands::inspect(&RetrievalConfig::from_env()?, show, k, &queries).await
        }
        Commands::Summary { title, records } => {
            commands::summary(&RetrievalConfig::from_env()?, &title, records.as_deref()).await
        }
        Commands::Tools => commands::tools(),
    }
}
