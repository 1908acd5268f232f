//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::{path::Path, sync::Arc};

use apexhash_core::{Document, DocumentId, DocumentStore};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{decode_body, encode_body, encode_dt, encode_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Every operation is scoped to one logical database name, so several
/// databases can share a file without seeing each other's collections.
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  database: Arc<str>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, database: &str) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self {
      conn,
      database: database.into(),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(database: &str) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self {
      conn,
      database: database.into(),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store from a connection string.
  ///
  /// Accepts `sqlite::memory:` or `:memory:` for an in-memory store, and
  /// `sqlite://<path>`, `sqlite:<path>` or a bare filesystem path for a file.
  pub async fn connect(url: &str, database: &str) -> Result<Self> {
    let url = url.trim();
    if url == ":memory:" || url == "sqlite::memory:" {
      return Self::open_in_memory(database).await;
    }

    let path = url
      .strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .unwrap_or(url);
    if path.is_empty() || path.contains("://") {
      return Err(Error::UnsupportedUrl(url.to_owned()));
    }

    debug!(path, database, "opening sqlite document store");
    Self::open(path, database).await
  }

  /// A handle on another logical database sharing this connection.
  pub fn database(&self, name: &str) -> Self {
    Self {
      conn:     self.conn.clone(),
      database: name.into(),
    }
  }

  pub fn database_name(&self) -> &str { &self.database }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn insert_one(&self, collection: &str, document: Document) -> Result<DocumentId> {
    let id = DocumentId::new();

    let id_str      = encode_id(id);
    let database    = self.database.to_string();
    let collection  = collection.to_owned();
    let body        = encode_body(document)?;
    let inserted_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (doc_id, database_name, collection, body_json, inserted_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, database, collection, body, inserted_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  async fn list_collection_names(&self) -> Result<Vec<String>> {
    let database = self.database.to_string();

    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT collection FROM documents
           WHERE database_name = ?1
           ORDER BY collection",
        )?;
        let names = stmt
          .query_map(rusqlite::params![database], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;

    Ok(names)
  }

  async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
    let id_str     = encode_id(id);
    let database   = self.database.to_string();
    let collection = collection.to_owned();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT body_json FROM documents
             WHERE doc_id = ?1 AND database_name = ?2 AND collection = ?3",
            rusqlite::params![id_str, database, collection],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    body.map(|b| decode_body(id, &b)).transpose()
  }

  async fn count_documents(&self, collection: &str) -> Result<u64> {
    let database   = self.database.to_string();
    let collection = collection.to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM documents WHERE database_name = ?1 AND collection = ?2",
          rusqlite::params![database, collection],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }
}
