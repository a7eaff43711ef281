//! Revocation registry: revoking credentials and reading revocation state.
//!
//! The [`RegistryConnector`] trait is the seam between the revocation
//! client and a concrete ledger. Two connectors ship with the crate:
//! - [`EvmRegistry`]: JSON-RPC to an EVM chain, signing with the caller's key
//! - [`InMemoryRegistry`]: an in-process ledger for tests and offline use
//!
//! No connector retries internally; transport failures surface as
//! [`crate::ProofError::RegistryUnavailable`] for the caller to retry.

pub mod client;
pub mod config;
pub mod evm;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::Identity;
use crate::status::{CredentialId, RegistryLocation};

pub use client::{Authorization, RevocationClient, RevocationStatus};
pub use config::{NetworkConfig, RegistryConfig};
pub use evm::EvmRegistry;
pub use memory::InMemoryRegistry;

/// A `Revoked(issuer, identifier)` event emitted by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedEvent {
    pub issuer: Identity,
    pub credential_id: CredentialId,
}

/// Outcome of a confirmed revoke transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    /// `Revoked` events emitted by the registry contract in this transaction.
    pub events: Vec<RevokedEvent>,
}

/// Ledger access for a revocation registry.
#[async_trait]
pub trait RegistryConnector: Send + Sync {
    /// The identity revocations are recorded under (the connector's signing address).
    fn caller(&self) -> Identity;

    /// Submit `revoke(id)` to the registry and wait for confirmation.
    async fn submit_revoke(
        &self,
        registry: &RegistryLocation,
        id: &CredentialId,
    ) -> Result<RevokeReceipt>;

    /// Read-only `revoked(issuer, identifier)`: ledger height, 0 if not revoked.
    async fn revoked_at(
        &self,
        registry: &RegistryLocation,
        issuer: &Identity,
        identifier: &str,
    ) -> Result<u64>;
}
