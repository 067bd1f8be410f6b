//! # API Module
//!
//! HTTP handlers for the web3 tool server, mounted under `/api`.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - Liveness plus current provider connectivity
//! - `GET /tools` - Tool descriptors with their input schemas
//! - `POST /contract/call` - Read-only contract call, result as text
//! - `POST /rpc` - MCP JSON-RPC over HTTP

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod contract;
pub mod health;
pub mod rpc;
pub mod tools;

/// Build the full HTTP application with every route nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/tools", get(tools::list_tools_handler))
        .route("/contract/call", post(contract::call_contract_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc::rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
