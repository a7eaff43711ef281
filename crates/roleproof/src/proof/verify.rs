//! Role proof verification.
//!
//! Verification checks:
//! 1. The membership claim was signed by the trusted issuer
//! 2. The role claim was signed by the membership's delegator
//! 3. Both credentials are unexpired at `now`
//!
//! Revocation is not consulted here; see
//! [`crate::registry::RevocationClient::authorize`].
//!
//! Both signer recoveries and all comparisons run on every call, and the
//! address comparisons are constant-time, so the rejection kind is the only
//! thing a prober learns.

use ethers::types::Address;
use subtle::{Choice, ConstantTimeEq};

use crate::crypto::encoding::encode;
use crate::crypto::signing::recover_signer;
use crate::identity::{parse_address, Identity};

use super::claim::RoleProof;

/// Why a role proof was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The membership claim was not signed by the trusted issuer.
    IssuerMismatch,
    /// The role claim was not signed by the membership's delegator.
    DelegatorMismatch,
    /// `now` is at or past one of the expiries.
    Expired,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssuerMismatch => "issuer_mismatch",
            Self::DelegatorMismatch => "delegator_mismatch",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Accepted,
    Rejected(Rejection),
}

impl VerificationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Verify a role proof against a trusted issuer at time `now` (ms since epoch).
pub fn verify(proof: &RoleProof, trusted_issuer: &Identity, now: u64) -> VerificationResult {
    let membership = &proof.membership_proof;

    let issuer_signer = recover_signer(&encode(&membership.claim), &membership.signed_proof);
    let role_signer = recover_signer(&encode(&proof.claim), &proof.signed_proof);

    let issuer_ok = signer_matches(issuer_signer, trusted_issuer);
    let delegator_ok = signer_matches(role_signer, &membership.claim.delegator_address);
    let fresh = Choice::from((now < membership.claim.delegator_credential_expiry) as u8)
        & Choice::from((now < proof.claim.delegate_credential_expiry) as u8);

    let result = if !bool::from(issuer_ok) {
        VerificationResult::Rejected(Rejection::IssuerMismatch)
    } else if !bool::from(delegator_ok) {
        VerificationResult::Rejected(Rejection::DelegatorMismatch)
    } else if !bool::from(fresh) {
        VerificationResult::Rejected(Rejection::Expired)
    } else {
        VerificationResult::Accepted
    };

    log::debug!("role proof for {}: {:?}", proof.claim.delegate_address, result);
    result
}

fn signer_matches(recovered: Option<Address>, expected: &Identity) -> Choice {
    let expected_address = parse_address(expected.as_str());
    let present = Choice::from((recovered.is_some() && expected_address.is_some()) as u8);
    let recovered = recovered.unwrap_or_default();
    let expected_address = expected_address.unwrap_or_default();
    present & recovered.as_bytes().ct_eq(expected_address.as_bytes())
}
