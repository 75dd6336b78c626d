//! HTTP server for the product catalog.
//!
//! Wires the JSON API from `catalog-api` to a [`Catalog`], adds the health
//! probe and request tracing, and owns the server's configuration shape.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, routing::get};
use catalog_core::{Catalog, CatalogConfig, store::CatalogStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Store path that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Runtime server configuration, deserialised from `catalog.toml` and
/// `CATALOG_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub catalog:    CatalogConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("catalog.db"),
      catalog:    CatalogConfig::default(),
    }
  }
}

impl ServerConfig {
  /// The configured store path with a leading `~` expanded, or `None` for an
  /// in-memory store.
  pub fn resolved_store_path(&self) -> Option<PathBuf> {
    if self.store_path.as_os_str() == IN_MEMORY {
      return None;
    }
    Some(expand_tilde(&self.store_path))
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `catalog`.
pub fn router<S>(catalog: Arc<Catalog<S>>) -> Router
where
  S: CatalogStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .merge(catalog_api::api_router(catalog))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
