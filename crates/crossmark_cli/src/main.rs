//! Crossmark - terminal front end
//!
//! Plays tic-tac-toe matches on stdin/stdout and prints configuration.

#![warn(missing_docs)]

mod cli;
mod driver;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use crossmark::{GameConfig, MatchSession};
use driver::Driver;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            mode,
            side,
            config,
            seed,
            json_events,
        } => {
            let config = load_config(config)?;
            let mode = mode.with_side(side);
            match seed {
                Some(seed) => {
                    let session = MatchSession::seeded(config, seed);
                    Driver::new(session, mode, json_events).run().await
                }
                None => {
                    let session = MatchSession::from_entropy(config);
                    Driver::new(session, mode, json_events).run().await
                }
            }
        }
        Command::Config { config } => {
            let config = load_config(config)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Loads the configuration file, or the defaults when none is given.
#[instrument]
fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            info!("Using default configuration");
            Ok(GameConfig::default())
        }
    }
}
