//! HTTP handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Liveness message |
//! | `GET`  | `/test` | Store diagnostics; always 200 |
//! | `POST` | `/api/contact` | Body: contact lead fields |
//! | `POST` | `/api/plan-inquiry` | Body: plan inquiry fields |

pub mod diagnostics;
pub mod leads;

use axum::Json;
use serde_json::{Value, json};

/// `GET /`
pub async fn root() -> Json<Value> { Json(json!({ "message": "ApexHash Backend Running" })) }
