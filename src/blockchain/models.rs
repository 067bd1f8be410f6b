// src/blockchain/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Prefix every failed call result carries across the tool boundary.
pub const ERROR_PREFIX: &str = "Error: ";

// --- Error types for contract calls ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Web3 provider not connected")]
    NotConnected,
    #[error("invalid arguments: {0}")]
    InvalidRequest(String),
    #[error("invalid contract address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),
    #[error("function '{0}' not found in ABI")]
    FunctionNotFound(String),
    #[error("function '{name}' expects {} argument(s), got {got}", join_arities(.expected))]
    ArgumentCount {
        name: String,
        expected: Vec<usize>,
        got: usize,
    },
    #[error("invalid argument {index} for '{name}': {reason}")]
    InvalidArgument {
        name: String,
        index: usize,
        reason: String,
    },
    #[error("could not encode arguments for '{name}': {reason}")]
    Encode { name: String, reason: String },
    #[error("{0}")]
    Rpc(String),
    #[error("could not decode output of '{name}': {reason}")]
    Decode { name: String, reason: String },
}

fn join_arities(expected: &[usize]) -> String {
    expected
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

impl CallError {
    /// Render the error the way it crosses the tool boundary.
    pub fn to_result_text(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self)
    }
}

// --- Call models ---

/// One read-only contract invocation, as received from the tool caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    /// Contract address in any letter case; normalized before use.
    #[serde(alias = "contractAddress")]
    pub contract_address: String,
    /// ABI entries: a JSON array, a string holding one, or an artifact with an `abi` field.
    pub abi: Value,
    #[serde(alias = "functionName")]
    pub function_name: String,
    /// Positional arguments. Absent, `null` and `[]` all mean "no arguments".
    #[serde(default)]
    pub args: Option<Vec<Value>>,
}

impl CallRequest {
    pub fn new(contract_address: impl Into<String>, abi: Value, function_name: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            abi,
            function_name: function_name.into(),
            args: None,
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Arguments as a slice, empty when none were supplied.
    pub fn args(&self) -> &[Value] {
        self.args.as_deref().unwrap_or(&[])
    }

    /// Build a request from an untyped argument bundle.
    pub fn from_value(value: &Value) -> Result<Self, CallError> {
        serde_json::from_value(value.clone()).map_err(|e| CallError::InvalidRequest(e.to_string()))
    }
}

/// Body returned by the HTTP call endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    pub result: String,
}
