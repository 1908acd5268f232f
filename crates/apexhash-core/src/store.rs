//! The `DocumentStore` trait: the seam between record creation and persistence.
//!
//! The trait is implemented by storage backends (e.g. `apexhash-store-sqlite`).
//! The creation service and the HTTP layer depend on this abstraction, so tests
//! can substitute their own doubles.

use std::{fmt, future::Future, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schema-flexible stored document: a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The field under which a store exposes a document's identifier.
pub const ID_FIELD: &str = "_id";

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Identifier assigned by the store when a document is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl Default for DocumentId {
  fn default() -> Self { Self::new() }
}

impl From<Uuid> for DocumentId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0.hyphenated(), f)
  }
}

impl FromStr for DocumentId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a document database holding independent named collections.
///
/// Writes are insert-only: nothing in this service updates or deletes a
/// document. A single insert is atomic; there are no multi-document
/// transactions.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `document` into `collection` and return the identifier the store
  /// assigned. Any `_id` already present in `document` is replaced.
  fn insert_one<'a>(
    &'a self,
    collection: &'a str,
    document: Document,
  ) -> impl Future<Output = Result<DocumentId, Self::Error>> + Send + 'a;

  /// Names of the collections that hold at least one document, sorted.
  fn list_collection_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Fetch a stored document, with its `_id`. Returns `None` if not found.
  fn find_one<'a>(
    &'a self,
    collection: &'a str,
    id: DocumentId,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Number of documents in `collection`; zero for an unknown collection.
  fn count_documents<'a>(
    &'a self,
    collection: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
