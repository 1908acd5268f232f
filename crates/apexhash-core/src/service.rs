//! Validation & creation: the single path from an external payload to a
//! stored record.
//!
//! The store handle is passed in by the caller. A payload that fails its
//! schema never reaches the store; a valid one produces exactly one insert
//! attempt, with no retry.

use tracing::{debug, info};

use crate::{
  Error, Result,
  record::{ContactLead, PlanInquiry, Record, RecordKind},
  store::{Document, DocumentId, DocumentStore},
};

/// Validate `payload` against `kind`'s schema, insert the canonical record into
/// the kind's collection and return the store-assigned identifier.
pub async fn create_document<S>(
  store: &S,
  kind: RecordKind,
  payload: &Document,
) -> Result<DocumentId>
where
  S: DocumentStore,
{
  match kind {
    RecordKind::ContactLead => create_record(store, &admit::<ContactLead>(payload)?).await,
    RecordKind::PlanInquiry => create_record(store, &admit::<PlanInquiry>(payload)?).await,
  }
}

/// Insert an already-validated record into its collection.
pub async fn create_record<S, R>(store: &S, record: &R) -> Result<DocumentId>
where
  S: DocumentStore,
  R: Record,
{
  let collection = R::KIND.collection();
  let id = store
    .insert_one(collection, record.to_document())
    .await
    .map_err(|e| Error::Storage(Box::new(e)))?;

  info!(collection, %id, "document created");
  Ok(id)
}

fn admit<R: Record>(payload: &Document) -> Result<R> {
  R::validate(payload).map_err(|e| {
    let kind = R::KIND;
    debug!(%kind, error = %e, "payload rejected");
    Error::Validation(e)
  })
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use serde_json::{Value, json};

  use super::*;
  use crate::{record::FieldError, store::ID_FIELD};

  #[derive(Debug, thiserror::Error)]
  #[error("connection refused")]
  struct Offline;

  /// In-memory store double that can be switched offline.
  #[derive(Default)]
  struct MemoryStore {
    docs:     Mutex<Vec<(String, DocumentId, Document)>>,
    attempts: AtomicUsize,
    offline:  bool,
  }

  impl MemoryStore {
    fn offline() -> Self {
      Self {
        offline: true,
        ..Self::default()
      }
    }

    fn attempts(&self) -> usize { self.attempts.load(Ordering::SeqCst) }
  }

  impl DocumentStore for MemoryStore {
    type Error = Offline;

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<DocumentId, Offline> {
      self.attempts.fetch_add(1, Ordering::SeqCst);
      if self.offline {
        return Err(Offline);
      }
      let id = DocumentId::new();
      document.insert(ID_FIELD.into(), id.to_string().into());
      self.docs.lock().unwrap().push((collection.to_owned(), id, document));
      Ok(id)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, Offline> {
      let mut names: Vec<String> =
        self.docs.lock().unwrap().iter().map(|(c, _, _)| c.clone()).collect();
      names.sort();
      names.dedup();
      Ok(names)
    }

    async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, Offline> {
      Ok(
        self
          .docs
          .lock()
          .unwrap()
          .iter()
          .find(|(c, i, _)| c == collection && *i == id)
          .map(|(_, _, d)| d.clone()),
      )
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, Offline> {
      Ok(self.docs.lock().unwrap().iter().filter(|(c, _, _)| c == collection).count() as u64)
    }
  }

  fn payload(v: Value) -> Document {
    match v {
      Value::Object(m) => m,
      other => panic!("not an object: {other}"),
    }
  }

  #[tokio::test]
  async fn valid_contact_lead_is_stored_once() {
    let store = MemoryStore::default();
    let id = create_document(
      &store,
      RecordKind::ContactLead,
      &payload(json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "hashrate": "500 TH/s",
      })),
    )
    .await
    .unwrap();

    assert!(!id.to_string().is_empty());
    assert_eq!(store.count_documents("contactlead").await.unwrap(), 1);
    assert_eq!(store.count_documents("planinquiry").await.unwrap(), 0);

    let doc = store.find_one("contactlead", id).await.unwrap().unwrap();
    assert_eq!(doc["name"], "Jane Doe");
    assert_eq!(doc["hashrate"], "500 TH/s");
    assert_eq!(doc["company"], Value::Null);
    assert_eq!(doc["message"], Value::Null);
  }

  #[tokio::test]
  async fn valid_plan_inquiry_goes_to_its_own_collection() {
    let store = MemoryStore::default();
    let id = create_document(
      &store,
      RecordKind::PlanInquiry,
      &payload(json!({
        "plan": "Enterprise",
        "email": "ops@corp.com",
        "notes": "need 2MW",
      })),
    )
    .await
    .unwrap();

    assert_eq!(store.list_collection_names().await.unwrap(), vec!["planinquiry"]);
    let doc = store.find_one("planinquiry", id).await.unwrap().unwrap();
    assert_eq!(doc["notes"], "need 2MW");
  }

  #[tokio::test]
  async fn invalid_payload_never_touches_the_store() {
    let store = MemoryStore::default();
    for bad in [
      json!({ "email": "jane@example.com" }),
      json!({ "name": "Jane" }),
      json!({ "name": "Jane", "email": "not-an-email" }),
    ] {
      let err = create_document(&store, RecordKind::ContactLead, &payload(bad))
        .await
        .unwrap_err();
      assert!(err.is_validation(), "unexpected error: {err}");
    }
    assert_eq!(store.attempts(), 0);
  }

  #[tokio::test]
  async fn validation_error_names_the_field() {
    let store = MemoryStore::default();
    let err = create_document(
      &store,
      RecordKind::ContactLead,
      &payload(json!({ "name": "Jane", "email": "bad-email" })),
    )
    .await
    .unwrap_err();

    let Error::Validation(v) = &err else {
      panic!("expected validation error, got {err}");
    };
    assert_eq!(v.field("email"), Some(&FieldError::InvalidEmail));
  }

  #[tokio::test]
  async fn storage_failure_is_distinct_and_not_retried() {
    let store = MemoryStore::offline();
    let err = create_document(
      &store,
      RecordKind::PlanInquiry,
      &payload(json!({ "plan": "Starter", "email": "a@b.co" })),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(!err.is_validation());
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(store.attempts(), 1);
  }

  #[tokio::test]
  async fn same_payload_twice_yields_two_documents() {
    let store = MemoryStore::default();
    let body = payload(json!({ "plan": "Starter", "email": "a@b.co" }));

    let first = create_document(&store, RecordKind::PlanInquiry, &body).await.unwrap();
    let second = create_document(&store, RecordKind::PlanInquiry, &body).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.count_documents("planinquiry").await.unwrap(), 2);
  }

  #[tokio::test]
  async fn typed_record_can_be_stored_directly() {
    let store = MemoryStore::default();
    let lead = ContactLead::validate(&payload(json!({
      "name": "Sam",
      "email": "sam@miner.io",
      "company": "Hashers Ltd",
    })))
    .unwrap();

    let id = create_record(&store, &lead).await.unwrap();
    let doc = store.find_one("contactlead", id).await.unwrap().unwrap();
    let stored: ContactLead = serde_json::from_value(Value::Object(doc)).unwrap();
    assert_eq!(stored, lead);
  }
}
