// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Connection provider for the configured RPC endpoint
    pub provider: Arc<blockchain::client::Web3Provider>,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let provider = blockchain::client::Web3Provider::from_config(&config);
        Self {
            config,
            provider: Arc::new(provider),
        }
    }
}
