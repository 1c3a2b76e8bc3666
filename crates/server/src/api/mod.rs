//! JSON HTTP API.
//!
//! Every response uses one envelope: `{"success": true, "data": ...}` on
//! success and `{"success": false, "error": "..."}` on failure. Storage calls
//! are synchronous redb transactions and run on the blocking pool.

mod admin;
mod auth;
pub mod error;
pub mod extract;
mod voting;

use std::future::Future;

use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::ResultExt;
use tokio::net::TcpListener;

pub use self::error::ApiError;
use self::error::WorkerSnafu;
use crate::state::AppState;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    pub data: T,
}

/// Handler result.
pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Wraps `data` in the success envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope { success: true, data }))
}

/// `{"message": ...}` payload.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub message: &'static str,
}

/// Runs a synchronous storage call on the blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.context(WorkerSnafu)?
}

/// Builds the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth::routes())
        .nest("/api/voting", voting::routes())
        .nest("/api/admin", admin::routes())
        .fallback(fallback)
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves, then drains
/// in-flight requests.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

async fn health() -> ApiResult<Health> {
    ok(Health { status: "OK", timestamp: Utc::now(), version: env!("CARGO_PKG_VERSION") })
}

async fn fallback() -> ApiError {
    ApiError::NotFound { what: "Route" }
}
