//! Error types for `apexhash-core`.

use thiserror::Error;

use crate::record::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
  /// The payload failed its schema. Raised before any store interaction.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The store was unreachable or rejected the insert.
  #[error("store error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
