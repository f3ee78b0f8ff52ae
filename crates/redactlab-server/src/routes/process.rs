//! Full pipeline route.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use redactlab_runtime::PipelineRequest;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/process", post(process))
}

/// POST /api/process
async fn process(State(state): State<Arc<AppState>>, Json(req): Json<PipelineRequest>) -> Response {
    match state.orchestrator.run(state.extractor.as_ref(), req).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e),
    }
}
