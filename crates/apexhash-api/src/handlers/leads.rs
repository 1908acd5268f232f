//! Handlers for the lead-creation endpoints.
//!
//! Both read the body as a loose JSON object and hand it to
//! [`apexhash_core::create_document`], which owns validation and the insert.

use apexhash_core::{Document, DocumentId, DocumentStore, RecordKind, create_document};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Success body: `{"status":"ok","id":"<id>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub status: String,
  pub id:     DocumentId,
}

impl From<DocumentId> for Created {
  fn from(id: DocumentId) -> Self {
    Self {
      status: "ok".to_owned(),
      id,
    }
  }
}

/// `POST /api/contact`
pub async fn create_contact<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Created>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
{
  create(&state, RecordKind::ContactLead, body).await
}

/// `POST /api/plan-inquiry`
pub async fn create_plan_inquiry<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Created>, ApiError>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
{
  create(&state, RecordKind::PlanInquiry, body).await
}

async fn create<S>(
  state: &AppState<S>,
  kind: RecordKind,
  body: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Created>, ApiError>
where
  S: DocumentStore,
{
  let Json(payload) = body?;

  let Some(store) = state.store.as_deref() else {
    // Bad input is still reported as such when the store is down.
    kind.validate(&payload)?;
    return Err(ApiError::StoreUnavailable);
  };

  let id = create_document(store, kind, &payload).await?;
  Ok(Json(Created::from(id)))
}
