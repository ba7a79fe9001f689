//! planner-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `PLANNER_*` environment variables, opens the JSON data directory, and
//! serves the REST API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use planner_server::ServerConfig;
use planner_store_json::{JsonStore, seed};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Study planner API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Fill empty collections with sample data before serving.
  #[arg(long)]
  seed: bool,

  /// Empty every collection before serving. Runs before `--seed`.
  #[arg(long)]
  reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PLANNER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the data directory.
  let store = JsonStore::open(server_cfg.data_paths())
    .await
    .with_context(|| format!("failed to open data directory {:?}", server_cfg.data_dir))?;

  if cli.reset {
    seed::reset(store.db())
      .await
      .context("failed to reset collections")?;
  }
  if cli.seed {
    seed::seed_if_empty(store.db())
      .await
      .context("failed to seed collections")?;
  }

  let app = planner_server::router(Arc::new(store), &server_cfg)?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
