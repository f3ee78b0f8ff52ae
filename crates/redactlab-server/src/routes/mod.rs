//! HTTP route handlers.

pub mod evaluation;
pub mod extractor;
pub mod health;
pub mod process;
pub mod redaction;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use redactlab_core::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(redaction::routes())
        .merge(evaluation::routes())
        .merge(process::routes())
        .merge(extractor::routes())
}

/// Map a pipeline error onto an HTTP status with an `{"error": ...}` body.
pub(crate) fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::InputTooLarge { .. } | Error::AlignmentTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        Error::UnknownCategory(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!("Request failed: {}", err);
    }
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}
