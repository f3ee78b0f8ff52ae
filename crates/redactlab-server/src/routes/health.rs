//! Liveness and capability probe.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "extractorAvailable": state.extractor.is_available(),
        "extractor": state.extractor.name(),
        "defaultMode": state.config.default_mode,
        "maxTextChars": state.config.max_text_chars,
    }))
}
