//! Strictly Oracle - terminal host.

#![warn(missing_docs)]

mod cli;
mod play;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_oracle::{OracleConfig, SourceKind};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            source,
            human,
        } => play::run_play(load_config(&config, source)?, human.into()).await,
        Command::Watch {
            config,
            source,
            games,
        } => play::run_watch(load_config(&config, source)?, games).await,
    }
}

/// Loads the config file, falling back to defaults when it does not exist.
#[instrument(skip_all, fields(path = %path.display()))]
fn load_config(path: &Path, source: Option<SourceKind>) -> Result<OracleConfig> {
    let config = if path.exists() {
        OracleConfig::from_file(path)?
    } else {
        warn!("Config file not found, using defaults");
        OracleConfig::default()
    };
    let config = match source {
        Some(source) => config.with_source(source),
        None => config,
    };
    info!(source = ?config.source(), side = %config.side(), "Configuration ready");
    Ok(config)
}
