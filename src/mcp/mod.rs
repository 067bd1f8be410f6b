// MCP surface: JSON-RPC framing, the tool descriptor and request dispatch
pub mod handler;
pub mod protocol;
pub mod tool;
