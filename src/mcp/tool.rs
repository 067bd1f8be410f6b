// src/mcp/tool.rs

use serde::Serialize;
use serde_json::{json, Value};

use crate::blockchain::{client::Web3Provider, services::contract::call_web3_function_from_value};

/// Name and description a host framework uses to list and select a tool.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// The read-only contract call tool.
pub const WEB3_TOOL: ToolDescriptor = ToolDescriptor {
    name: "web3_tool",
    description: "Calls a function on an Ethereum smart contract using Web3.",
};

const TOOLS: &[ToolDescriptor] = &[WEB3_TOOL];

/// Every tool this server exposes.
pub fn tools() -> &'static [ToolDescriptor] {
    TOOLS
}

pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    tools().iter().find(|t| t.name == name)
}

impl ToolDescriptor {
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "contract_address": {"type": "string", "description": "The 0x... contract address (any letter case)."},
                "abi": {"type": ["array", "string", "object"], "description": "Contract ABI entries, a JSON string holding them, or a build artifact with an `abi` field."},
                "function_name": {"type": "string", "description": "Name of the view/pure function to call."},
                "args": {"type": "array", "description": "Positional arguments in ABI order. Omit for no-argument functions."}
            },
            "required": ["contract_address", "abi", "function_name"]
        })
    }

    /// MCP `tools/list` entry
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema()
        })
    }

    pub async fn invoke(&self, provider: &Web3Provider, args: &Value) -> String {
        call_web3_function_from_value(provider, args).await
    }
}
