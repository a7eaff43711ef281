//! Claim and proof records.
//!
//! Field names on the wire follow the shape ledger actors accept as a
//! call parameter:
//!
//! ```json
//! { "signer", "role", "delegateCredentialIdHash", "delegateCredentialExpiryDate",
//!   "signedProof",
//!   "membershipProof": { "issuer", "delegatorAddress", "delegatorCredentialIdHash",
//!                        "delegatorCredentialExpiryDate", "signedProof" } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::encoding::CanonicalClaim;
use crate::crypto::signing::SignedProof;
use crate::error::{ProofError, Result};
use crate::identity::{CredentialFingerprint, Identity};

/// "The issuer vouches that `delegator_address` is a legitimate organization,
/// bound to an off-chain credential valid until expiry."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipClaim {
    pub issuer: Identity,
    pub delegator_address: Identity,
    #[serde(rename = "delegatorCredentialIdHash")]
    pub delegator_credential_fingerprint: CredentialFingerprint,
    /// Milliseconds since Unix epoch.
    #[serde(rename = "delegatorCredentialExpiryDate")]
    pub delegator_credential_expiry: u64,
}

impl CanonicalClaim for MembershipClaim {
    fn canonical_fields(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("issuer", Value::from(self.issuer.as_str())),
            ("delegatorAddress", Value::from(self.delegator_address.as_str())),
            (
                "delegatorCredentialIdHash",
                Value::from(self.delegator_credential_fingerprint.as_str()),
            ),
            (
                "delegatorCredentialExpiryDate",
                Value::from(self.delegator_credential_expiry),
            ),
        ])
    }
}

/// A membership claim signed by the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipProof {
    #[serde(flatten)]
    pub claim: MembershipClaim,
    pub signed_proof: SignedProof,
}

/// "The organization grants `delegate_address` the named role, bound to a
/// credential, until expiry."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClaim {
    #[serde(rename = "signer")]
    pub delegate_address: Identity,
    pub role: String,
    #[serde(rename = "delegateCredentialIdHash")]
    pub delegate_credential_fingerprint: CredentialFingerprint,
    /// Milliseconds since Unix epoch.
    #[serde(rename = "delegateCredentialExpiryDate")]
    pub delegate_credential_expiry: u64,
}

impl CanonicalClaim for RoleClaim {
    fn canonical_fields(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("signer", Value::from(self.delegate_address.as_str())),
            ("role", Value::from(self.role.as_str())),
            (
                "delegateCredentialIdHash",
                Value::from(self.delegate_credential_fingerprint.as_str()),
            ),
            (
                "delegateCredentialExpiryDate",
                Value::from(self.delegate_credential_expiry),
            ),
        ])
    }
}

/// The complete per-call authorization token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleProof {
    #[serde(flatten)]
    pub claim: RoleClaim,
    pub signed_proof: SignedProof,
    pub membership_proof: MembershipProof,
}

impl RoleProof {
    /// The earlier of the two expiries; the proof is usable strictly before it.
    pub fn expires_at(&self) -> u64 {
        self.claim
            .delegate_credential_expiry
            .min(self.membership_proof.claim.delegator_credential_expiry)
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ProofError::SerializationError(e.to_string()))
    }

    /// Parse from the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ProofError::SerializationError(e.to_string()))
    }
}

impl MembershipProof {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ProofError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ProofError::SerializationError(e.to_string()))
    }
}
