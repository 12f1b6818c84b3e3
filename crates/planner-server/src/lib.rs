//! HTTP server wiring for the resource planner.
//!
//! Mounts [`planner_api::api_router`] under `/api` and wraps it in CORS and
//! request tracing. Configuration comes from an optional TOML file layered
//! under `PLANNER_*` environment variables.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{HeaderValue, header, header::InvalidHeaderValue},
};
use planner_core::store::PlannerStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration. Every field has a default, so an absent
/// config file is not an error.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  /// Browser origins allowed to call `/api/*`.
  pub cors_origins:  Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          5000,
      database_path: PathBuf::from("resource_planner.db"),
      cors_origins:  vec!["http://localhost:4200".to_string()],
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then let `PLANNER_*` variables override it
  /// (`PLANNER_PORT=8080`, `PLANNER_CORS_ORIGINS=http://a,http://b`).
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("PLANNER")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Allow the configured origins, any method, and a JSON `Content-Type`.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o))
    .collect::<Result<Vec<_>, _>>()?;
  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods(Any)
      .allow_headers([header::CONTENT_TYPE]),
  )
}

/// The complete application: the API under `/api`, with CORS and tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, InvalidHeaderValue>
where
  S: PlannerStore + 'static,
{
  Ok(
    Router::new()
      .nest("/api", planner_api::api_router(store))
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Tests ────────────────────────────────────────────────────────────────────
