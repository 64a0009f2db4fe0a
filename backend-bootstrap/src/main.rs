use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::instrument::WithSubscriber;

use backend_infrastructure::{AppConfig, CONFIG_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "events-backend")]
#[command(about = "Chapter events ingest and query service", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Run one ingest pass and exit
    Ingest {
        /// First start date to fetch, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Last start date to fetch, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },
    /// Print every stored event id
    EventIds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = &args.config {
        std::env::set_var(CONFIG_PATH_ENV, config);
    }

    let config = AppConfig::load()
        .with_subscriber(backend_bootstrap::startup_subscriber())
        .await?;
    let _log_guard = backend_bootstrap::init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "events-backend starting");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => backend_bootstrap::run_standalone(&config).await,
        Command::Ingest { from, to } => {
            backend_bootstrap::run_ingest_once(&config, from.as_deref(), to.as_deref()).await
        }
        Command::EventIds => backend_bootstrap::print_event_ids(&config).await,
    }
}
