//! `roster` — command-line access to the employee and review store.
//!
//! # Usage
//!
//! ```
//! roster init
//! roster department add Engineering
//! roster employee add --name Alice --job-title Engineer --department 1
//! roster review add --year 2024 --summary "Strong year" --employee 1
//! roster --json review list
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use roster_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;
use settings::RosterConfig;

#[derive(Parser)]
#[command(name = "roster", author, version, about = "Employees and their performance reviews")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the configuration.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Print records as JSON instead of one line each.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let store_path = match cli.store {
    Some(path) => path,
    None => RosterConfig::load(&cli.config)?.store_path(),
  };

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = ?store_path, "opened store");

  commands::run(cli.command, &store, cli.json).await
}
