//! RoleProof: two-level delegated authorization with on-chain revocation.
//!
//! A trusted issuer signs a membership proof vouching for an organization;
//! the organization signs a role proof granting a role to one of its
//! actors. Role proofs verify offline against a configured trusted issuer.
//! Credentials referenced by tokens or proofs can be revoked in, and
//! checked against, an EVM revocation registry.

pub mod crypto;
pub mod error;
pub mod identity;
pub mod proof;
pub mod registry;
pub mod status;
pub mod time;

// Re-export primary types
pub use error::{NotRevocable, ProofError, Result, TransactionError};
pub use identity::{CredentialFingerprint, Identity};

// Re-export signing types
pub use crypto::{encode, recover_signer, CanonicalClaim, ClaimSigner, LocalKey, SignedProof};

// Re-export proof types
pub use proof::{
    build_membership_proof, build_role_proof, verify, MembershipClaim, MembershipProof,
    Rejection, RoleClaim, RoleProof, VerificationResult,
};

// Re-export status types
pub use status::{
    resolve_credential_id, resolve_issuer, resolve_status, CredentialId, CredentialToken,
    RegistryLocation, StatusEntry,
};

// Re-export registry types
pub use registry::{
    Authorization, EvmRegistry, InMemoryRegistry, NetworkConfig, RegistryConfig,
    RegistryConnector, RevocationClient, RevocationStatus,
};
