//! Scoring routes: edit-distance statistics and token diff.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/evaluate", post(evaluate))
        .route("/diff", post(diff))
}

#[derive(serde::Deserialize)]
struct EvaluateBody {
    original: String,
    redacted: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default, rename = "entityCount")]
    entity_count: usize,
}

#[derive(serde::Deserialize)]
struct DiffBody {
    actual: String,
    expected: String,
}

/// POST /api/evaluate
async fn evaluate(State(state): State<Arc<AppState>>, Json(body): Json<EvaluateBody>) -> Response {
    let result = state
        .orchestrator
        .evaluate(
            &body.original,
            &body.redacted,
            body.entity_count,
            body.reference.as_deref(),
        )
        .await;
    match result {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/diff
async fn diff(State(state): State<Arc<AppState>>, Json(body): Json<DiffBody>) -> Response {
    match state.orchestrator.compare(&body.actual, &body.expected).await {
        Ok(alignment) => Json(alignment).into_response(),
        Err(e) => error_response(e),
    }
}
