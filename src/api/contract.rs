// src/api/contract.rs

use crate::{
    blockchain::{models::CallResponse, services::contract::call_web3_function_from_value},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use tracing::debug;

/// Run one read-only contract call.
///
/// Always answers 200: failures travel inside `result` as `Error: ...` text,
/// the same way they do for MCP clients.
pub async fn call_contract_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    debug!("Contract call request: {}", body);
    let result = call_web3_function_from_value(&state.provider, &body).await;
    (StatusCode::OK, Json(CallResponse { result }))
}
