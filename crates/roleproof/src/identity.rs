//! Identities and credential fingerprints.
//!
//! An identity is the Ethereum-style address derived from a secp256k1
//! public key. It is both the bearer identity inside claims and the
//! namespace key on the registry ledger.

use ethers::types::Address;
use ethers::utils::{keccak256, to_checksum};
use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};

/// An address-like identity string.
///
/// Two identities that both parse as 20-byte addresses are equal when the
/// bytes are equal, regardless of checksum casing. Anything else is
/// compared as an exact string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Wrap an identity string verbatim.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Render an address in EIP-55 checksum form.
    pub fn from_address(address: Address) -> Self {
        Self(to_checksum(&address, None))
    }

    /// Take the last `:`-delimited segment, so `did:ethr:dev:0xab` becomes `0xab`.
    pub fn from_did(did: &str) -> Self {
        let tail = did.rsplit(':').next().unwrap_or(did);
        Self(tail.to_string())
    }

    /// Parse into 20 address bytes.
    pub fn to_address(&self) -> Result<Address> {
        parse_address(&self.0)
            .ok_or_else(|| ProofError::InvalidAddress(format!("not a 20-byte hex address: {}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse `0x`-prefixed (or bare) 40-digit hex into an address.
pub(crate) fn parse_address(value: &str) -> Option<Address> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.len() != 40 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some(Address::from_slice(&bytes))
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        match (parse_address(&self.0), parse_address(&other.0)) {
            (Some(a), Some(b)) => a == b,
            _ => self.0 == other.0,
        }
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match parse_address(&self.0) {
            Some(address) => address.as_bytes().hash(state),
            None => self.0.hash(state),
        }
    }
}

impl From<Address> for Identity {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque hex hash identifying a verifiable credential without revealing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialFingerprint(pub String);

impl CredentialFingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Keccak-256 of the raw credential (e.g. its compact JWT form).
    pub fn of_credential(raw: impl AsRef<[u8]>) -> Self {
        Self(format!("0x{}", hex::encode(keccak256(raw))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
