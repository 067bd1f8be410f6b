//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the server.
//! It handles incoming MCP requests and dispatches them to the tool.
//!
//! ## Supported Tools
//!
//! - `web3_tool` - Call a read-only contract function via its ABI
//!
//! Tool failures are not JSON-RPC errors: they come back as a text result
//! starting with `Error: ` and with `isError` set.

use serde_json::{json, Value};
use tracing::info;

use crate::{
    mcp::{
        protocol::{error_codes, Request, Response, MCP_PROTOCOL_VERSION},
        tool::{find_tool, tools},
    },
    AppState,
};

/// Method names that are rewritten into `tools/call` for the web3 tool.
const WEB3_TOOL_ALIASES: [&str; 2] = ["web3_tool", "call_web3_function"];

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method calls from simple clients reuse the tools/call path
        method if WEB3_TOOL_ALIASES.contains(&method) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": "web3_tool",
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the named tool.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let Some(tool) = find_tool(tool_name) else {
        return Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        );
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let text = tool.invoke(&state.provider, args).await;
    Response::tool_text(req.id, text)
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "web3_tool",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Ethereum read-only contract call server. Results and errors are returned as text.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request.
fn handle_tools_list(req: &Request) -> Response {
    let tools: Vec<Value> = tools().iter().map(|t| t.to_json()).collect();
    Response::success(req.id.clone(), json!({ "tools": tools }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{blockchain::client::Web3Provider, config::Config};
    use std::sync::Arc;

    fn offline_state() -> AppState {
        AppState {
            config: Config::default(),
            provider: Arc::new(Web3Provider::new("http://127.0.0.1:1")),
        }
    }

    fn request(id: Value, method: &str, params: Option<Value>) -> Request {
        Request {
            jsonrpc: "2.0".into(),
            id,
            method: method.into(),
            params,
        }
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let resp = handle_mcp_request(request(Value::Null, "tools/list", None), offline_state()).await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn initialize_reports_tool_capability() {
        let resp = handle_mcp_request(request(json!(1), "initialize", None), offline_state())
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], json!(false));
    }

    #[tokio::test]
    async fn tools_list_contains_web3_tool() {
        let resp = handle_mcp_request(request(json!(2), "tools/list", None), offline_state())
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], "web3_tool");
    }

    #[tokio::test]
    async fn unknown_method_and_tool_are_rejected() {
        let resp = handle_mcp_request(request(json!(3), "eth_sendTransaction", None), offline_state())
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        let resp = handle_mcp_request(
            request(json!(4), "tools/call", Some(json!({ "name": "write_contract" }))),
            offline_state(),
        )
        .await
        .unwrap();
        assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn tools_call_without_name_is_invalid_params() {
        let resp = handle_mcp_request(request(json!(5), "tools/call", Some(json!({}))), offline_state())
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn offline_tool_call_returns_error_text() {
        let args = json!({
            "contract_address": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "abi": [],
            "function_name": "totalSupply"
        });
        let resp = handle_mcp_request(request(json!(6), "call_web3_function", Some(args)), offline_state())
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["text"], "Error: Web3 provider not connected");
        assert_eq!(result["isError"], json!(true));
    }
}
