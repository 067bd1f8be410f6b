//! Connection provider for an Ethereum JSON-RPC endpoint.
//!
//! One `Web3Provider` is built at startup and shared read-only by every
//! invocation. Construction never fails: a bad endpoint only shows up as a
//! failed connectivity check when a call is attempted.

use std::sync::Arc;

use ethers::types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest};
use ethers_core::abi::Abi;
use ethers_providers::{Http, Middleware, Provider};

use crate::blockchain::{models::CallError, services::contract::ContractHandle};
use crate::config::{redact_url, Config};

/// Shared handle to the configured RPC endpoint
#[derive(Clone, Debug)]
pub struct Web3Provider {
    provider: Option<Arc<Provider<Http>>>,
    endpoint: String,
}

impl Web3Provider {
    /// Create a provider for the given RPC URL
    pub fn new(rpc_url: &str) -> Self {
        let endpoint = redact_url(rpc_url);
        let provider = match Provider::<Http>::try_from(rpc_url) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                tracing::warn!("Failed to create provider for {}: {}", endpoint, e);
                None
            }
        };

        Self { provider, endpoint }
    }

    /// Create the provider described by the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.rpc_endpoint())
    }

    /// Endpoint scheme and host, safe to log
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the endpoint currently answers JSON-RPC requests.
    ///
    /// Issues `web3_clientVersion`; any transport or RPC error counts as
    /// disconnected.
    pub async fn is_connected(&self) -> bool {
        let Some(provider) = &self.provider else {
            return false;
        };
        match provider.client_version().await {
            Ok(version) => {
                tracing::debug!("Connected to {} ({})", self.endpoint, version);
                true
            }
            Err(e) => {
                tracing::warn!("Provider at {} is not reachable: {}", self.endpoint, e);
                false
            }
        }
    }

    /// Bind a contract-interface handle to a normalized address and ABI
    pub fn contract(&self, address: &str, abi: &Abi) -> Result<ContractHandle<'_>, CallError> {
        ContractHandle::new(self, address, abi)
    }

    /// Execute a read-only `eth_call` against the latest block
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, CallError> {
        let provider = self.provider.as_ref().ok_or(CallError::NotConnected)?;
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        provider
            .call(&tx, None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))
    }
}
