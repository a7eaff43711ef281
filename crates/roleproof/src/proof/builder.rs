//! Proof issuance.
//!
//! Two distinct keys sign the two levels. The issuer key is a separately
//! held root of trust attesting the organization's standing; the delegator
//! key is the organization's own key, attesting its actors' roles. The two
//! are never interchangeable.

use crate::crypto::encoding::encode;
use crate::crypto::signing::ClaimSigner;
use crate::error::Result;
use crate::identity::{CredentialFingerprint, Identity};

use super::claim::{MembershipClaim, MembershipProof, RoleClaim, RoleProof};

/// Issue a membership proof: `issuer_key` vouches for `delegator_address`.
pub fn build_membership_proof(
    issuer_key: &dyn ClaimSigner,
    delegator_address: Identity,
    fingerprint: CredentialFingerprint,
    expiry: u64,
) -> Result<MembershipProof> {
    let claim = MembershipClaim {
        issuer: issuer_key.address(),
        delegator_address,
        delegator_credential_fingerprint: fingerprint,
        delegator_credential_expiry: expiry,
    };
    let signed_proof = issuer_key.sign_message(&encode(&claim))?;

    log::debug!(
        "issued membership proof for {} by {}",
        claim.delegator_address,
        claim.issuer
    );

    Ok(MembershipProof {
        claim,
        signed_proof,
    })
}

/// Issue a role proof: the organization (`delegator_key`) grants `role` to
/// `delegate_address`, carrying its own membership proof along.
pub fn build_role_proof(
    delegator_key: &dyn ClaimSigner,
    delegate_address: Identity,
    role: impl Into<String>,
    fingerprint: CredentialFingerprint,
    expiry: u64,
    membership_proof: MembershipProof,
) -> Result<RoleProof> {
    let claim = RoleClaim {
        delegate_address,
        role: role.into(),
        delegate_credential_fingerprint: fingerprint,
        delegate_credential_expiry: expiry,
    };
    let signed_proof = delegator_key.sign_message(&encode(&claim))?;

    log::debug!(
        "issued role proof '{}' for {} by {}",
        claim.role,
        claim.delegate_address,
        delegator_key.address()
    );

    Ok(RoleProof {
        claim,
        signed_proof,
        membership_proof,
    })
}
