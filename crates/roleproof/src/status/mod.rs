//! Credential status: locating a credential's revocation record.
//!
//! A verifiable-credential token points at its revocation registry through
//! its `credentialStatus` entry. This module decodes tokens and resolves
//! that pointer, the credential id and the issuer without any network I/O.

pub mod resolve;
pub mod token;

pub use resolve::{
    resolve_credential_id, resolve_issuer, resolve_status, RegistryLocation, StatusEntry,
    ETHR_STATUS_REGISTRY_2019,
};
pub use token::{CredentialId, CredentialStatus, CredentialToken, IssuerRef, VcPayload};
