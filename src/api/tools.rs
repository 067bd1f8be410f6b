use axum::{response::IntoResponse, Json};
use serde_json::Value;

use crate::mcp::tool::tools;

pub async fn list_tools_handler() -> impl IntoResponse {
    let list: Vec<Value> = tools().iter().map(|t| t.to_json()).collect();
    Json(list)
}
