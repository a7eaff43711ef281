//! Revocation client: revoke credentials and query their status.
//!
//! All token inspection happens before the connector is touched, so a
//! token that cannot be revoked fails without any ledger I/O.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransactionError};
use crate::identity::{CredentialFingerprint, Identity};
use crate::proof::{verify, Rejection, RoleProof, VerificationResult};
use crate::status::{
    resolve_credential_id, resolve_issuer, resolve_status, CredentialId, CredentialToken,
    RegistryLocation,
};

use super::RegistryConnector;

/// Revocation state of one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationStatus {
    pub revoked: bool,
    /// Ledger height at which the revocation was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl RevocationStatus {
    /// Interpret a `revoked(issuer, id)` reading; 0 means not revoked.
    pub fn from_height(height: u64) -> Self {
        if height == 0 {
            Self {
                revoked: false,
                block_number: None,
            }
        } else {
            Self {
                revoked: true,
                block_number: Some(height),
            }
        }
    }
}

/// Outcome of [`RevocationClient::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    /// The offline checks failed; the registry was not consulted.
    Rejected(Rejection),
    /// A credential bound into the proof has been revoked.
    Revoked(CredentialFingerprint),
}

impl Authorization {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Revokes credentials and reads revocation state through a connector.
pub struct RevocationClient<C: RegistryConnector> {
    connector: C,
}

impl<C: RegistryConnector> RevocationClient<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Revoke the credential described by `token` under the caller's key.
    ///
    /// Returns the identifier echoed by the registry's `Revoked` event.
    pub async fn revoke(&self, token: &CredentialToken) -> Result<CredentialId> {
        let status = resolve_status(token)?;
        let registry = status.registry_location()?;
        let id = resolve_credential_id(token)?;

        log::debug!("revoking credential {id} at {registry}");
        self.submit(&registry, &id).await
    }

    /// Revoke a credential fingerprint directly, so [`Self::authorize`]
    /// starts refusing proofs bound to it.
    pub async fn revoke_fingerprint(
        &self,
        registry: &RegistryLocation,
        fingerprint: &CredentialFingerprint,
    ) -> Result<CredentialId> {
        let id = CredentialId::new(fingerprint.as_str());
        log::debug!("revoking fingerprint {fingerprint} at {registry}");
        self.submit(registry, &id).await
    }

    async fn submit(&self, registry: &RegistryLocation, id: &CredentialId) -> Result<CredentialId> {
        let receipt = self.connector.submit_revoke(registry, id).await?;
        let caller = self.connector.caller();

        match receipt
            .events
            .into_iter()
            .find(|e| e.credential_id == *id && e.issuer == caller)
        {
            Some(event) => {
                log::info!(
                    "credential {} revoked by {} in {} (block {:?})",
                    event.credential_id,
                    event.issuer,
                    receipt.tx_hash,
                    receipt.block_number
                );
                Ok(event.credential_id)
            }
            None => {
                log::warn!(
                    "revoke transaction {} emitted no Revoked event for {caller}",
                    receipt.tx_hash
                );
                Err(TransactionError::NoEventFound {
                    tx_hash: receipt.tx_hash,
                }
                .into())
            }
        }
    }

    /// Read whether the credential described by `token` has been revoked by its issuer.
    pub async fn check_revoked(&self, token: &CredentialToken) -> Result<RevocationStatus> {
        let status = resolve_status(token)?;
        let registry = status.registry_location()?;
        let id = resolve_credential_id(token)?;
        let issuer = resolve_issuer(token)?;

        let height = self
            .connector
            .revoked_at(&registry, &issuer, id.as_str())
            .await?;
        log::debug!("credential {id} from {issuer} at {registry}: height {height}");
        Ok(RevocationStatus::from_height(height))
    }

    /// Verify `proof` offline, then check that neither bound credential has
    /// been revoked in `registry`.
    ///
    /// The membership fingerprint is looked up under the membership issuer,
    /// the role fingerprint under the delegator that signed the role claim.
    pub async fn authorize(
        &self,
        proof: &RoleProof,
        trusted_issuer: &Identity,
        now: u64,
        registry: &RegistryLocation,
    ) -> Result<Authorization> {
        if let VerificationResult::Rejected(rejection) = verify(proof, trusted_issuer, now) {
            return Ok(Authorization::Rejected(rejection));
        }

        let membership = &proof.membership_proof.claim;
        let checks = [
            (&membership.issuer, &membership.delegator_credential_fingerprint),
            (
                &membership.delegator_address,
                &proof.claim.delegate_credential_fingerprint,
            ),
        ];

        for (issuer, fingerprint) in checks {
            let height = self
                .connector
                .revoked_at(registry, issuer, fingerprint.as_str())
                .await?;
            if height > 0 {
                log::debug!("authorization refused: {fingerprint} revoked at height {height}");
                return Ok(Authorization::Revoked(fingerprint.clone()));
            }
        }

        Ok(Authorization::Granted)
    }
}
