//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"detail": "<message>"}`. Caller mistakes map to
//! 400, a missing store to 503 and a failed insert to 500. Unless
//! `strict_error_status` is set, the router then reports all of them as 500.

use apexhash_core::record::ValidationError;
use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The body was not a JSON object.
  #[error("invalid request body: {0}")]
  Body(String),

  #[error(transparent)]
  Core(#[from] apexhash_core::Error),

  #[error("database not available")]
  StoreUnavailable,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Body(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) if e.is_validation() => StatusCode::BAD_REQUEST,
      ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::Body(rejection.body_text()) }
}

impl From<ValidationError> for ApiError {
  fn from(e: ValidationError) -> Self { ApiError::Core(e.into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::warn!(error = %self, "request failed");
    }
    (status, Json(json!({ "detail": self.to_string() }))).into_response()
  }
}
