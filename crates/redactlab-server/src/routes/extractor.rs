//! Extractor provider configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use redactlab_extract::providers;
use redactlab_extract::types::*;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extractor/config", get(get_config).put(update_config))
        .route("/extractor/config/test", post(test_key))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<ExtractorConfigResponse> {
    Json(state.extractor_config.read().to_response())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ExtractorConfigUpdate>,
) -> impl IntoResponse {
    let mut config = state.extractor_config.write();
    config.apply_update(&update);

    if let Err(e) = config.save() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Failed to save config: {}", e) })),
        );
    }

    (
        StatusCode::OK,
        Json(serde_json::to_value(config.to_response()).unwrap_or_default()),
    )
}

async fn test_key(Json(req): Json<TestKeyRequest>) -> impl IntoResponse {
    match providers::test_api_key(&req.provider, &req.api_key).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))),
        Err(e) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": false, "error": e })),
        ),
    }
}
