// src/config.rs

use std::env;

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

/// Alchemy network slug used when `ALCHEMY_NETWORK` is not set.
pub const DEFAULT_ALCHEMY_NETWORK: &str = "eth-mainnet";

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Explicit JSON-RPC endpoint. Takes precedence over the Alchemy template.
    pub rpc_url: Option<String>,
    /// Alchemy API key, spliced into the endpoint template.
    pub alchemy_api_key: Option<SecretString>,
    /// Alchemy network slug, e.g. `eth-mainnet` or `eth-sepolia`.
    pub alchemy_network: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rpc_url: None,
            alchemy_api_key: None,
            alchemy_network: DEFAULT_ALCHEMY_NETWORK.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// A missing API key is not an error here: the resulting endpoint is
    /// malformed and the provider reports itself as disconnected later.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").ok().filter(|s| !s.trim().is_empty());
        let alchemy_api_key = env::var("ALCHEMY_API_KEY").ok().map(SecretString::new);
        let alchemy_network = env::var("ALCHEMY_NETWORK")
            .unwrap_or_else(|_| DEFAULT_ALCHEMY_NETWORK.to_string());

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            rpc_url,
            alchemy_api_key,
            alchemy_network,
        })
    }

    /// The endpoint URL the connection provider should use.
    pub fn rpc_endpoint(&self) -> String {
        if let Some(url) = &self.rpc_url {
            return url.clone();
        }
        let key = self
            .alchemy_api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .unwrap_or("");
        format!("https://{}.g.alchemy.com/v2/{}", self.alchemy_network, key)
    }

    /// Endpoint description that is safe to log (host only, never the key).
    pub fn redacted_endpoint(&self) -> String {
        redact_url(&self.rpc_endpoint())
    }
}

/// Reduce a URL to scheme and host so path-embedded secrets stay out of logs.
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(u) => match (u.host_str(), u.port()) {
            (Some(host), Some(port)) => format!("{}://{}:{}", u.scheme(), host, port),
            (Some(host), None) => format!("{}://{}", u.scheme(), host),
            _ => format!("{}://<no host>", u.scheme()),
        },
        Err(_) => "<invalid url>".to_string(),
    }
}
