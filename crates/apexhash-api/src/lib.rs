//! JSON HTTP API for the ApexHash lead-capture backend.
//!
//! Exposes an axum [`Router`] backed by any [`DocumentStore`]. CORS is fully
//! open; there is no authentication.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = apexhash_api::router(AppState { store: Some(Arc::new(store)), config });
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::ApiError;

use std::sync::Arc;

use apexhash_core::DocumentStore;
use axum::{
  Router,
  extract::Request,
  http::StatusCode,
  middleware::{self, Next},
  response::Response,
  routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// `store` is `None` when the process started without a usable store; the
/// creation endpoints then fail (503 under `strict_error_status`) and
/// diagnostics say so.
#[derive(Clone)]
pub struct AppState<S: DocumentStore> {
  pub store:  Option<Arc<S>>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DocumentStore + Clone + Send + Sync + 'static,
{
  let mut leads = Router::new()
    .route("/api/contact", post(handlers::leads::create_contact::<S>))
    .route("/api/plan-inquiry", post(handlers::leads::create_plan_inquiry::<S>));

  if !state.config.strict_error_status {
    leads = leads.route_layer(middleware::from_fn(collapse_error_status));
  }

  Router::new()
    .route("/", get(handlers::root))
    .route("/test", get(handlers::diagnostics::handler::<S>))
    .merge(leads)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Report every failed creation as a 500, keeping the `detail` body.
async fn collapse_error_status(req: Request, next: Next) -> Response {
  let mut response = next.run(req).await;
  let status = response.status();
  if status.is_client_error() || status.is_server_error() {
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
  }
  response
}
