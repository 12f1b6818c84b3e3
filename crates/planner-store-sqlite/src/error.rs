//! Error type for `planner-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain failure (missing entity, invalid merged record) detected while
  /// holding the transaction.
  #[error(transparent)]
  Core(#[from] planner_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A stored column could not be turned back into a domain value.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for planner_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => planner_core::Error::Store(Box::new(other)),
    }
  }
}
