//! Handler for `GET /test`: a read-only report on the document store.
//!
//! Never fails the request. Every problem it meets is rendered as a status
//! string inside a 200 response.

use apexhash_core::DocumentStore;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// At most this many collection names are reported.
pub const MAX_COLLECTIONS: usize = 10;

/// Store errors are cut to this many characters.
const ERROR_EXCERPT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
  pub backend:           String,
  pub database:          String,
  pub database_url:      Option<String>,
  pub database_name:     Option<String>,
  pub connection_status: String,
  pub collections:       Vec<String>,
}

impl Default for Diagnostics {
  fn default() -> Self {
    Self {
      backend:           "✅ Running".to_owned(),
      database:          "❌ Not Available".to_owned(),
      database_url:      None,
      database_name:     None,
      connection_status: "Not Connected".to_owned(),
      collections:       Vec::new(),
    }
  }
}

fn set_flag(value: &Option<String>) -> Option<String> {
  let set = value.as_deref().is_some_and(|v| !v.is_empty());
  Some(if set { "✅ Set" } else { "❌ Not Set" }.to_owned())
}

/// `GET /test`
pub async fn handler<S>(State(state): State<AppState<S>>) -> Json<Diagnostics>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
{
  let mut report = Diagnostics::default();

  let Some(store) = state.store.as_deref() else {
    report.database = "⚠️  Available but not initialized".to_owned();
    return Json(report);
  };

  report.database = "✅ Available".to_owned();
  report.database_url = set_flag(&state.config.database_url);
  report.database_name = set_flag(&state.config.database_name);

  match store.list_collection_names().await {
    Ok(mut names) => {
      names.truncate(MAX_COLLECTIONS);
      report.collections = names;
      report.database = "✅ Connected & Working".to_owned();
      report.connection_status = "Connected".to_owned();
    }
    Err(e) => {
      let excerpt: String = e.to_string().chars().take(ERROR_EXCERPT).collect();
      tracing::warn!(error = %e, "collection listing failed");
      report.database = format!("⚠️  Connected but Error: {excerpt}");
    }
  }

  Json(report)
}
