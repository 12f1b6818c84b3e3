//! planner-server binary.
//!
//! Reads `planner.toml` (or the path given with `--config`) plus `PLANNER_*`
//! environment variables, opens the SQLite store, and serves the REST API.
//!
//! ```text
//! planner-server                 # serve
//! planner-server init-db         # create the schema and exit
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use planner_server::{ServerConfig, expand_tilde};
use planner_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Resource planner REST server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "planner.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the API (the default).
  Serve,
  /// Create the database and its schema, then exit.
  InitDb,
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

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  if let Some(Command::InitDb) = cli.command {
    println!("Initialized the database at {}", database_path.display());
    return Ok(());
  }

  let app = planner_server::app(Arc::new(store), &server_cfg)
    .context("invalid CORS origin in configuration")?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
