//! Pattern detection, redaction and entity merge routes.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use redactlab_core::{Entity, RedactionMode};
use redactlab_redact::{detect_pattern_entities, merge};

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/detect", post(detect))
        .route("/redact", post(redact))
        .route("/merge", post(merge_entities))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(serde::Deserialize)]
struct TextInput {
    text: String,
}

#[derive(serde::Deserialize)]
struct RedactBody {
    text: String,
    /// Entities to redact. Pattern detection is used when omitted.
    #[serde(default)]
    entities: Option<Vec<Entity>>,
    #[serde(default)]
    mode: Option<RedactionMode>,
}

#[derive(serde::Deserialize)]
struct MergeBody {
    primary: Vec<Entity>,
    #[serde(default)]
    secondary: Vec<Entity>,
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

async fn detect(Json(input): Json<TextInput>) -> Json<serde_json::Value> {
    let entities = detect_pattern_entities(&input.text);
    Json(serde_json::json!({
        "count": entities.len(),
        "entities": entities,
    }))
}

async fn redact(State(state): State<Arc<AppState>>, Json(body): Json<RedactBody>) -> Response {
    let mode = body
        .mode
        .unwrap_or(state.orchestrator.settings().default_mode);
    let result = match &body.entities {
        Some(entities) => state.orchestrator.redact_with(&body.text, entities, mode),
        None => state.orchestrator.quick_pass(&body.text, mode),
    };
    match result {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(e),
    }
}

async fn merge_entities(Json(body): Json<MergeBody>) -> Json<serde_json::Value> {
    let entities = merge(body.primary, body.secondary);
    Json(serde_json::json!({
        "count": entities.len(),
        "entities": entities,
    }))
}
