//! # pitstop-queue
//!
//! CLI tool for inspecting and driving the Pitstop offline action queue.
//!
//! ## Commands
//!
//! - `enqueue`: Queue an action for later sync
//! - `list`: List queued actions
//! - `status`: Show queue counts
//! - `sync`: Run one sync pass
//! - `discard`: Remove a queued action
//!
//! ## Example
//!
//! ```bash
//! # Queue a booking while offline
//! pitstop-queue enqueue bookAppointment '{"service":"Oil Change","date":"2025-01-10"}'
//!
//! # See what is waiting
//! pitstop-queue list --status pending
//!
//! # Replay against the backend
//! pitstop-queue sync
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pitstop_queue_client::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{discard, enqueue, list, status, sync, QueueContext};

/// CLI tool for the Pitstop offline action queue.
#[derive(Parser, Debug)]
#[command(name = "pitstop-queue")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to pitstop.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Queue database, overriding the configured one
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Queue an action for later sync
    Enqueue {
        /// Remote operation tag (e.g. bookAppointment)
        kind: String,

        /// JSON payload
        payload: String,
    },

    /// List queued actions
    List {
        /// Only show actions in this state (pending, synced, failed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show queue counts
    Status,

    /// Run one sync pass
    Sync {
        /// Treat connectivity as unavailable
        #[arg(long)]
        offline: bool,

        /// Use the mock dispatcher instead of the HTTP backend
        #[arg(long)]
        mock: bool,
    },

    /// Remove a queued action
    Discard {
        /// Action ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // Logs go to stderr so command output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let database = cli
        .database
        .unwrap_or_else(|| config.storage.database.clone());
    tracing::debug!("Using queue database {}", database.display());
    let ctx = QueueContext::new(config, database);

    match cli.command {
        Commands::Enqueue { kind, payload } => {
            enqueue::run(&ctx, &kind, &payload).await?;
        }
        Commands::List { status } => {
            list::run(&ctx, status.as_deref()).await?;
        }
        Commands::Status => {
            status::run(&ctx).await?;
        }
        Commands::Sync { offline, mock } => {
            sync::run(&ctx, offline, mock).await?;
        }
        Commands::Discard { id } => {
            discard::run(&ctx, &id).await?;
        }
    }

    Ok(())
}

/// Load the explicit config file, or the default one if it exists.
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path).context("Failed to load configuration");
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            Config::from_file(&path).context("Failed to load configuration")
        }
        _ => Ok(Config::default()),
    }
}

/// Get the default config file path for pitstop-queue.
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("app", "pitstop", "pitstop-queue")
        .map(|dirs| dirs.config_dir().join("pitstop.toml"))
}
