use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let connected = state.provider.is_connected().await;
    Json(serde_json::json!({ "status": "ok", "connected": connected }))
}
