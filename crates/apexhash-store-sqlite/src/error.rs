//! Error type for `apexhash-store-sqlite`.

use apexhash_core::DocumentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The connection string names a backend this store cannot open.
  #[error("unsupported database url: {0:?}")]
  UnsupportedUrl(String),

  #[error("stored document {0} is not a JSON object")]
  NotAnObject(DocumentId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
