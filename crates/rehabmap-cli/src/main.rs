mod render;
mod scrape;
mod search;
mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rehabmap")]
#[command(about = "Map and search workplace rehabilitation providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the provider directory, geocode each address and write the dataset
    Scrape {
        /// Fetch and parse the directory, print what was found, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Dataset file to write (defaults to REHABMAP_DATA_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print map markers, one per distinct location
    Markers {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Geocode an address and list the nearest providers
    Search {
        /// Free-text address, e.g. "100 George St, Sydney"
        address: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Advance a company through normal, highlighted and hidden
    Cycle {
        /// Company name exactly as it appears in the dataset
        company: String,
    },
    /// Return every company to normal visibility
    Reset,
    /// Show recent searches, newest first
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Geojson,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = rehabmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape { dry_run, output } => {
            scrape::run_scrape_command(&config, dry_run, output.as_deref()).await
        }
        Commands::Markers { format } => state::run_markers(&config, format),
        Commands::Search { address, format } => {
            search::run_search(&config, &address, format).await
        }
        Commands::Cycle { company } => state::run_cycle(&config, &company),
        Commands::Reset => state::run_reset(&config),
        Commands::History => state::run_history(&config),
    }
}
