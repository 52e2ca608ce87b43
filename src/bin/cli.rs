//! nybooks CLI
//!
//! Local entry point for searches, health probes and the HTTP server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nybooks::{
    error::{AppError, Result},
    models::{Config, SearchRequest},
    pipeline,
    services::Services,
};

/// nybooks - Bestseller search by author
#[derive(Parser, Debug)]
#[command(
    name = "nybooks",
    version,
    about = "Search bestseller lists by author and publication year"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search books by author, optionally restricted to publication years
    Search {
        /// Author name
        #[arg(short, long)]
        author: String,

        /// Publication year; may be repeated
        #[arg(short, long = "year")]
        years: Vec<i32>,
    },

    /// Probe the upstream APIs
    Health,

    /// Validate the configuration file
    Validate,

    /// Serve the HTTP API
    #[cfg(feature = "server")]
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Initialize logging from the verbosity flag or the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    log::info!("nybooks starting...");

    match cli.command {
        Command::Search { author, years } => {
            config.validate()?;
            let services = Services::from_config(&config)?;

            let request = SearchRequest::new(author).with_years(years);
            let books = pipeline::run_search(&services.search, &request).await?;
            println!("{}", serde_json::to_string_pretty(&books)?);
        }

        Command::Health => {
            config.validate()?;
            let services = Services::from_config(&config)?;

            let report = pipeline::run_health(&services.health).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_up() {
                return Err(AppError::upstream("health", "one or more upstream APIs are down"));
            }
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
        }

        #[cfg(feature = "server")]
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            let services = Services::from_config(&config)?;

            nybooks::server::serve(&config.server, services.search, services.health).await?;
        }
    }

    Ok(())
}
