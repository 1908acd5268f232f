//! ApexHash API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus the
//! environment, opens the document store named by `DATABASE_URL` /
//! `DATABASE_NAME`, and serves the JSON API over HTTP.
//!
//! A store that cannot be opened is logged and the server starts without one,
//! so `GET /test` can report the problem.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use apexhash_api::{AppState, ServerConfig};
use apexhash_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "ApexHash lead-capture API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = open_store(&server_cfg).await;

  let state = AppState {
    store:  store.map(Arc::new),
    config: Arc::new(server_cfg.clone()),
  };

  let app = apexhash_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

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

/// Open the configured store, or `None` if it is unconfigured or unreachable.
async fn open_store(cfg: &ServerConfig) -> Option<SqliteStore> {
  let Some((url, name)) = cfg.store_settings() else {
    tracing::warn!("DATABASE_URL and DATABASE_NAME must both be set; running without a store");
    return None;
  };

  match SqliteStore::connect(url, name).await {
    Ok(store) => {
      tracing::info!(database = name, "document store ready");
      Some(store)
    }
    Err(e) => {
      tracing::warn!(error = %e, "failed to open document store; running without one");
      None
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
