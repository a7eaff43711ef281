//! Network endpoints for registry connectors.
//!
//! A status locator names a network namespace (`hardhat:0x…`); the config
//! maps each namespace to a JSON-RPC endpoint.
//!
//! JSON form:
//!
//! ```json
//! { "networks": { "hardhat": { "rpc_url": "http://127.0.0.1:8545", "chain_id": 31337 } } }
//! ```
//!
//! Environment form (`ROLEPROOF_NETWORKS`): `hardhat=http://127.0.0.1:8545,sepolia=https://…`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};

/// Environment variable read by [`RegistryConfig::from_env`].
pub const NETWORKS_ENV: &str = "ROLEPROOF_NETWORKS";

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_confirmations() -> usize {
    1
}

/// One JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// Queried from the node when absent.
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Per-request transport timeout; the only cancellation mechanism.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Blocks to wait for before a revoke counts as confirmed.
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

impl NetworkConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id: None,
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            confirmations: default_confirmations(),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Endpoints keyed by network namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(mut self, name: impl Into<String>, network: NetworkConfig) -> Self {
        self.networks.insert(name.into(), network);
        self
    }

    /// Look up the endpoint for a namespace.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks.get(name).ok_or_else(|| {
            ProofError::RegistryUnavailable(format!("no RPC endpoint configured for network '{name}'"))
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ProofError::Config(format!("invalid network config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse `name=url` pairs separated by commas.
    pub fn from_pairs(pairs: &str) -> Result<Self> {
        let mut config = Self::new();
        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, url) = pair
                .split_once('=')
                .ok_or_else(|| ProofError::Config(format!("expected name=url, got '{pair}'")))?;
            if name.trim().is_empty() || url.trim().is_empty() {
                return Err(ProofError::Config(format!("expected name=url, got '{pair}'")));
            }
            config = config.with_network(name.trim(), NetworkConfig::new(url.trim()));
        }
        Ok(config)
    }

    /// Read [`NETWORKS_ENV`]; an unset variable yields an empty config.
    pub fn from_env() -> Result<Self> {
        match std::env::var(NETWORKS_ENV) {
            Ok(pairs) => Self::from_pairs(&pairs),
            Err(_) => Ok(Self::new()),
        }
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(mut self, other: RegistryConfig) -> Self {
        self.networks.extend(other.networks);
        self
    }
}
