/*
 * Responsibility
 * - GET /health (疎通用)
 * - store backend 名も返す (memory で起動していないかの確認用)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "store": state.sns.backend_name()})),
    )
}
