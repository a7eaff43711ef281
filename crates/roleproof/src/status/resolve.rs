//! Status resolution: registry location, credential id and issuer.

use serde::{Deserialize, Serialize};

use crate::error::{NotRevocable, Result};
use crate::identity::Identity;

use super::token::{CredentialId, CredentialToken};

/// The only status method this client can act on.
pub const ETHR_STATUS_REGISTRY_2019: &str = "EthrStatusRegistry2019";

/// A validated `credentialStatus` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub method: String,
    /// `"<namespace>:<registryAddress>"`.
    pub locator: String,
}

/// Where a credential's revocation record lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryLocation {
    /// Network namespace, e.g. `hardhat` or `mainnet`.
    pub network: String,
    /// Registry contract address.
    pub address: Identity,
}

impl RegistryLocation {
    pub fn new(network: impl Into<String>, address: Identity) -> Self {
        Self {
            network: network.into(),
            address,
        }
    }
}

impl std::fmt::Display for RegistryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.network, self.address)
    }
}

impl StatusEntry {
    /// Split the locator into network namespace and registry address.
    ///
    /// Exactly two non-empty segments are required.
    pub fn registry_location(&self) -> std::result::Result<RegistryLocation, NotRevocable> {
        let segments: Vec<&str> = self.locator.split(':').collect();
        match segments.as_slice() {
            [network, address] if !network.is_empty() && !address.is_empty() => Ok(
                RegistryLocation::new(*network, Identity::new(*address)),
            ),
            _ => Err(NotRevocable::MalformedLocator(self.locator.clone())),
        }
    }
}

/// Read the token's revocation pointer: `credentialStatus`, then `vc.credentialStatus`.
pub fn resolve_status(token: &CredentialToken) -> Result<StatusEntry> {
    let status = token
        .credential_status
        .as_ref()
        .or_else(|| token.vc.as_ref().and_then(|vc| vc.credential_status.as_ref()))
        .ok_or(NotRevocable::MissingStatus)?;

    let method = status.method.as_deref().unwrap_or_default();
    if method != ETHR_STATUS_REGISTRY_2019 {
        return Err(NotRevocable::UnsupportedMethod(method.to_string()).into());
    }

    let entry = StatusEntry {
        method: method.to_string(),
        locator: status.locator.clone().unwrap_or_default(),
    };
    entry.registry_location()?;

    log::debug!("resolved credential status locator {}", entry.locator);
    Ok(entry)
}

/// Pick the credential id: `id`, then `vc.id`, then `jti`, then `vc.jti`.
pub fn resolve_credential_id(token: &CredentialToken) -> Result<CredentialId> {
    let vc = token.vc.as_ref();
    token
        .id
        .as_ref()
        .or_else(|| vc.and_then(|vc| vc.id.as_ref()))
        .or(token.jti.as_ref())
        .or_else(|| vc.and_then(|vc| vc.jti.as_ref()))
        .cloned()
        .ok_or_else(|| NotRevocable::MissingId.into())
}

/// The issuer's identity: last `:` segment of `iss`, falling back to `vc.issuer`.
pub fn resolve_issuer(token: &CredentialToken) -> Result<Identity> {
    token
        .iss
        .as_deref()
        .or_else(|| {
            token
                .vc
                .as_ref()
                .and_then(|vc| vc.issuer.as_ref())
                .map(|issuer| issuer.id())
        })
        .map(Identity::from_did)
        .ok_or_else(|| NotRevocable::MissingIssuer.into())
}
