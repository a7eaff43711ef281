//! EVM JSON-RPC registry connector.
//!
//! Talks to a deployed revocation registry contract:
//!
//! ```solidity
//! function revoke(string id) external;
//! function revoked(address issuer, string id) external view returns (uint256);
//! event Revoked(address indexed issuer, string id);
//! ```
//!
//! Transactions are signed locally with the caller's key; the RPC endpoint
//! only relays them. Each call connects afresh to the endpoint configured
//! for the locator's network namespace.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::parse_abi;
use ethers::contract::{BaseContract, Contract, ContractError};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, MiddlewareError, Provider, RpcError};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U256, U64};

use crate::crypto::signing::{ClaimSigner, LocalKey};
use crate::error::{ProofError, Result, TransactionError};
use crate::identity::Identity;
use crate::status::{CredentialId, RegistryLocation};

use super::config::{NetworkConfig, RegistryConfig};
use super::{RegistryConnector, RevokeReceipt, RevokedEvent};

/// Human-readable ABI of the registry contract.
pub const REGISTRY_ABI: &[&str] = &[
    "function revoke(string id)",
    "function revoked(address issuer, string id) view returns (uint256)",
    "event Revoked(address indexed issuer, string id)",
];

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Registry connector for EVM chains.
pub struct EvmRegistry {
    config: RegistryConfig,
    key: LocalKey,
    abi: BaseContract,
}

impl EvmRegistry {
    /// Create a connector that signs with `key`.
    pub fn new(config: RegistryConfig, key: LocalKey) -> Result<Self> {
        let abi = parse_abi(REGISTRY_ABI)
            .map_err(|e| ProofError::Config(format!("registry ABI: {e}")))?;
        Ok(Self {
            config,
            key,
            abi: BaseContract::from(abi),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    async fn contract(
        &self,
        registry: &RegistryLocation,
    ) -> Result<(Contract<Client>, &NetworkConfig)> {
        let network = self.config.network(&registry.network)?;
        let address = registry.address.to_address()?;

        let url = reqwest::Url::parse(&network.rpc_url)
            .map_err(|e| ProofError::Config(format!("invalid RPC url {}: {e}", network.rpc_url)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .build()
            .map_err(|e| {
                ProofError::RegistryUnavailable(format!("failed to build HTTP client: {e}"))
            })?;
        let provider = Provider::new(Http::new_with_client(url, http))
            .interval(Duration::from_millis(network.poll_interval_ms));

        let chain_id = match network.chain_id {
            Some(chain_id) => chain_id,
            None => provider
                .get_chainid()
                .await
                .map_err(|e| unavailable(&registry.network, e))?
                .as_u64(),
        };

        let wallet = self.key.wallet().clone().with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok((Contract::new(address, self.abi.clone(), client), network))
    }
}

fn unavailable(network: &str, error: impl std::fmt::Display) -> ProofError {
    ProofError::RegistryUnavailable(format!("{network}: {error}"))
}

/// Ledger answers (reverts, JSON-RPC error responses) become typed
/// transaction errors; anything else is a transport failure.
fn classify(network: &str, error: ContractError<Client>) -> ProofError {
    let answered = match &error {
        ContractError::Revert(data) => Some(format!("execution reverted: {data}")),
        ContractError::MiddlewareError { e } => {
            MiddlewareError::as_error_response(e).map(|r| r.to_string())
        }
        ContractError::ProviderError { e } => RpcError::as_error_response(e).map(|r| r.to_string()),
        _ => None,
    };
    match answered {
        Some(reason) => TransactionError::Rejected(reason).into(),
        None => unavailable(network, error),
    }
}

#[async_trait]
impl RegistryConnector for EvmRegistry {
    fn caller(&self) -> Identity {
        self.key.address()
    }

    async fn submit_revoke(
        &self,
        registry: &RegistryLocation,
        id: &CredentialId,
    ) -> Result<RevokeReceipt> {
        let (contract, network) = self.contract(registry).await?;
        let call = contract
            .method::<_, ()>("revoke", (id.to_string(),))
            .map_err(|e| ProofError::Config(format!("registry ABI: {e}")))?;

        let pending = call
            .send()
            .await
            .map_err(|e| classify(&registry.network, e))?;
        let tx_hash = format!("{:#x}", pending.tx_hash());
        log::debug!("submitted revoke({id}) to {registry} in {tx_hash}");

        let receipt = pending
            .confirmations(network.confirmations)
            .await
            .map_err(|e| unavailable(&registry.network, e))?
            .ok_or_else(|| TransactionError::Dropped {
                tx_hash: tx_hash.clone(),
            })?;

        if receipt.status != Some(U64::from(1)) {
            log::warn!("revoke transaction {tx_hash} reverted");
            return Err(TransactionError::Reverted { tx_hash }.into());
        }

        let events = receipt
            .logs
            .iter()
            .filter(|log| log.address == contract.address())
            .filter_map(|log| {
                contract
                    .decode_event::<(Address, String)>("Revoked", log.topics.clone(), log.data.clone())
                    .ok()
            })
            .map(|(issuer, id)| RevokedEvent {
                issuer: Identity::from_address(issuer),
                credential_id: CredentialId::new(id),
            })
            .collect();

        Ok(RevokeReceipt {
            tx_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()),
            events,
        })
    }

    async fn revoked_at(
        &self,
        registry: &RegistryLocation,
        issuer: &Identity,
        identifier: &str,
    ) -> Result<u64> {
        let issuer = issuer.to_address()?;
        let (contract, _) = self.contract(registry).await?;
        let height: U256 = contract
            .method::<_, U256>("revoked", (issuer, identifier.to_string()))
            .map_err(|e| ProofError::Config(format!("registry ABI: {e}")))?
            .call()
            .await
            .map_err(|e| classify(&registry.network, e))?;

        if height.bits() > 64 {
            return Err(ProofError::SerializationError(format!(
                "ledger height out of range: {height}"
            )));
        }
        Ok(height.low_u64())
    }
}
