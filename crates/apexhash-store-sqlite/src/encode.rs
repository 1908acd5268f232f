//! Encoding helpers between domain values and SQLite column text.
//!
//! Identifiers are stored as hyphenated lowercase UUIDs, timestamps as
//! RFC 3339 strings and bodies as compact JSON objects.

use apexhash_core::{Document, DocumentId, store::ID_FIELD};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{Error, Result};

pub fn encode_id(id: DocumentId) -> String { id.to_string() }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Serialise a body for storage. `_id` lives in its own column.
pub fn encode_body(mut document: Document) -> Result<String> {
  document.remove(ID_FIELD);
  Ok(serde_json::to_string(&document)?)
}

/// Parse a stored body and re-attach its `_id`.
pub fn decode_body(id: DocumentId, body: &str) -> Result<Document> {
  match serde_json::from_str(body)? {
    Value::Object(mut document) => {
      document.insert(ID_FIELD.into(), Value::String(encode_id(id)));
      Ok(document)
    }
    _ => Err(Error::NotAnObject(id)),
  }
}
