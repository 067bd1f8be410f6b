// src/blockchain/services/contract.rs

use std::collections::HashMap;

use ethers_core::abi::{Abi, Function, Token};
use ethers_core::types::{Address, Bytes};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::blockchain::{
    client::Web3Provider,
    models::{CallError, CallRequest},
    services::tokens::{coerce_tokens, render_outputs},
};
use crate::utils::{normalize_address, parse_address};

/// Parse an ABI given as a JSON array, a string holding one, or a build
/// artifact carrying an `abi` field.
pub fn parse_abi(value: &Value) -> Result<Abi, CallError> {
    let invalid = |e: serde_json::Error| CallError::InvalidAbi(e.to_string());
    match value {
        Value::String(s) => {
            let inner: Value = serde_json::from_str(s).map_err(invalid)?;
            if inner.is_string() {
                return Err(CallError::InvalidAbi("ABI string must contain JSON".into()));
            }
            parse_abi(&inner)
        }
        Value::Object(map) => match map.get("abi") {
            Some(abi) => parse_abi(abi),
            None => Err(CallError::InvalidAbi(
                "expected an array of ABI entries".into(),
            )),
        },
        Value::Array(_) => serde_json::from_value(value.clone()).map_err(invalid),
        other => Err(CallError::InvalidAbi(format!(
            "expected an array of ABI entries, got {}",
            other
        ))),
    }
}

/// Every overload of one ABI function name.
#[derive(Debug, Clone)]
pub struct BoundFunction {
    name: String,
    overloads: Vec<Function>,
}

impl BoundFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input arities accepted across overloads, ascending.
    pub fn arities(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.overloads.iter().map(|f| f.inputs.len()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Pick the overload matching `args` and encode its calldata.
    pub fn encode(&self, args: &[Value]) -> Result<(&Function, Bytes), CallError> {
        let candidates: Vec<&Function> = self
            .overloads
            .iter()
            .filter(|f| f.inputs.len() == args.len())
            .collect();

        if candidates.is_empty() {
            return Err(CallError::ArgumentCount {
                name: self.name.clone(),
                expected: self.arities(),
                got: args.len(),
            });
        }

        let mut first_err = None;
        for func in candidates {
            match coerce_tokens(func, args) {
                Ok(tokens) => {
                    let data = func.encode_input(&tokens).map_err(|e| CallError::Encode {
                        name: self.name.clone(),
                        reason: e.to_string(),
                    })?;
                    return Ok((func, Bytes::from(data)));
                }
                Err((index, reason)) => {
                    first_err.get_or_insert(CallError::InvalidArgument {
                        name: self.name.clone(),
                        index,
                        reason,
                    });
                }
            }
        }

        Err(first_err.unwrap_or_else(|| CallError::FunctionNotFound(self.name.clone())))
    }
}

/// A contract address bound to its callable functions.
///
/// The name → function map is built once at construction; lookups never
/// reflect over the ABI again.
#[derive(Debug)]
pub struct ContractHandle<'a> {
    provider: &'a Web3Provider,
    address: Address,
    checksummed: String,
    functions: HashMap<String, BoundFunction>,
}

impl<'a> ContractHandle<'a> {
    pub fn new(provider: &'a Web3Provider, address: &str, abi: &Abi) -> Result<Self, CallError> {
        let checksummed = normalize_address(address)?;
        let address = parse_address(&checksummed)?;
        let functions = abi
            .functions
            .iter()
            .map(|(name, overloads)| {
                (
                    name.clone(),
                    BoundFunction {
                        name: name.clone(),
                        overloads: overloads.clone(),
                    },
                )
            })
            .collect();

        Ok(Self {
            provider,
            address,
            checksummed,
            functions,
        })
    }

    /// Checksummed address the handle is bound to
    pub fn address(&self) -> &str {
        &self.checksummed
    }

    pub fn function(&self, name: &str) -> Result<&BoundFunction, CallError> {
        self.functions
            .get(name)
            .ok_or_else(|| CallError::FunctionNotFound(name.to_string()))
    }

    /// Run `name` as a read-only call and decode its outputs.
    pub async fn call(&self, name: &str, args: &[Value]) -> Result<Vec<Token>, CallError> {
        let bound = self.function(name)?;
        let (func, data) = bound.encode(args)?;
        info!(
            "Calling {}.{} with {} argument(s)",
            self.address(),
            bound.name(),
            args.len()
        );
        debug!("eth_call {} data=0x{}", self.address(), hex::encode(&data));

        let raw = self.provider.call(self.address, data).await?;
        decode_outputs(func, &raw)
    }
}

fn decode_outputs(func: &Function, raw: &[u8]) -> Result<Vec<Token>, CallError> {
    if func.outputs.is_empty() {
        return Ok(vec![]);
    }
    if raw.is_empty() {
        return Err(CallError::Decode {
            name: func.name.clone(),
            reason: "empty return data; is a contract deployed at this address?".into(),
        });
    }
    func.decode_output(raw).map_err(|e| CallError::Decode {
        name: func.name.clone(),
        reason: e.to_string(),
    })
}

/// Invoke a read-only contract function and render its result as text.
pub async fn call_contract_function(
    provider: &Web3Provider,
    request: &CallRequest,
) -> Result<String, CallError> {
    if !provider.is_connected().await {
        return Err(CallError::NotConnected);
    }

    let abi = parse_abi(&request.abi)?;
    let contract = provider.contract(&request.contract_address, &abi)?;
    let tokens = contract.call(&request.function_name, request.args()).await?;
    Ok(render_outputs(&tokens))
}

/// Tool boundary: always returns a string, never an error.
///
/// Success yields the rendered return value; any failure yields
/// `"Error: <description>"`.
pub async fn call_web3_function(provider: &Web3Provider, request: &CallRequest) -> String {
    match call_contract_function(provider, request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{}.{} failed: {}", request.contract_address, request.function_name, e);
            e.to_result_text()
        }
    }
}

/// Same as [`call_web3_function`], starting from an untyped argument bundle.
pub async fn call_web3_function_from_value(provider: &Web3Provider, args: &Value) -> String {
    match CallRequest::from_value(args) {
        Ok(request) => call_web3_function(provider, &request).await,
        Err(e) => {
            warn!("Rejected tool arguments: {}", e);
            e.to_result_text()
        }
    }
}
