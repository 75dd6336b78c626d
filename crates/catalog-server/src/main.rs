//! catalog server binary.
//!
//! Reads `catalog.toml` (or the path specified with `--config`) layered under
//! `CATALOG_*` environment variables, opens an in-process SQLite store, and
//! serves the catalog API over HTTP.
//!
//! Nested keys use `__` in the environment, e.g.
//! `CATALOG_CATALOG__DEFAULT_VARIANT_STOCK=50`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use catalog_core::Catalog;
use catalog_server::ServerConfig;
use catalog_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Product catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "catalog.toml")]
  config: PathBuf,
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
    .add_source(
      config::Environment::with_prefix("CATALOG")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = match server_cfg.resolved_store_path() {
    Some(path) => SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?,
    None => SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?,
  };

  let catalog = Arc::new(Catalog::new(store, server_cfg.catalog));
  let app = catalog_server::router(catalog);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
