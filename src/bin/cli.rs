//! namecheck CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use namecheck::{
    error::Result,
    models::{Catalog, Config},
    pipeline::{self, SearchOptions},
    utils,
};

/// namecheck - find accounts registered under a username
#[derive(Parser, Debug)]
#[command(name = "namecheck", version, about = "Username search across web services")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the catalog path from the configuration
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print results only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search every catalog site for the given usernames
    Search {
        /// One or more usernames
        #[arg(required = true)]
        usernames: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Report every status, not only claimed sites
        #[arg(long)]
        all: bool,
    },

    /// Validate configuration and catalog
    Validate,

    /// List catalog sites
    Sites,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);
    utils::log::init(cli.quiet);

    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog.path.clone());
    log::debug!("Using catalog {}", catalog_path.display());

    match cli.command {
        Command::Search {
            usernames,
            json,
            all,
        } => {
            config.validate()?;
            let catalog = Arc::new(Catalog::load(&catalog_path)?);
            let options = SearchOptions { json, all };
            pipeline::run_search(&config, catalog, &usernames, options).await?;
        }

        Command::Validate => {
            pipeline::run_validate(&config, &catalog_path)?;
        }

        Command::Sites => {
            let catalog = Catalog::load(&catalog_path)?;
            pipeline::run_sites(&catalog);
        }
    }

    Ok(())
}
