//! PlaceScout application: command line interface and HTTP API.

mod commands;
pub mod error;
pub mod prompt;
pub mod runner;
pub mod server;
pub mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use placescout_core::AppConfig;
use std::path::PathBuf;
use tracing::info;

/// Discover map search results and enrich them with contact details.
#[derive(Debug, Parser)]
#[command(name = "placescout", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true, env = "PLACESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands. Without one, `scrape` runs interactively.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one search and write the result files.
    Scrape {
        /// Search query, e.g. "dentist chicago". Prompted for when omitted.
        query: Option<String>,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Serve the HTTP API.
    Serve {
        /// Port to bind (overrides config and `PORT`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long)]
        host: Option<String>,
    },

    /// List stored result files.
    Files,
}

impl Default for Command {
    fn default() -> Self {
        Self::Scrape {
            query: None,
            yes: false,
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,placescout=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Parse the command line and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting PlaceScout v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command.unwrap_or_default() {
        Command::Scrape { query, yes } => commands::scrape(&config, query, yes).await,
        Command::Serve { port, host } => commands::serve(config, host, port).await,
        Command::Files => commands::files(&config).await,
    }
}
