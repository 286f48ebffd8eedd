//! Error types for `kudos-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Domain(#[from] kudos_core::Error),

  #[error("database error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("invalid uuid in database: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("invalid timestamp in database: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
