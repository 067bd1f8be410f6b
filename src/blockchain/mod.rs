// src/blockchain/mod.rs

// Connection provider for the configured RPC endpoint
pub mod client;
pub use client::Web3Provider;

pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::{CallError, CallRequest};
pub use services::contract::{call_contract_function, call_web3_function, ContractHandle};
