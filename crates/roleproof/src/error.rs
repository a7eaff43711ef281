//! Error types for RoleProof.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.
//!
//! Cryptographic mismatches are not errors: verification returns a
//! [`crate::proof::VerificationResult`] value instead.

/// Error type covering issuance, resolution and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid credential token: {0}")]
    InvalidToken(String),

    #[error("Credential is not revocable: {0}")]
    NotRevocable(#[from] NotRevocable),

    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Registry transaction failed: {0}")]
    TransactionError(#[from] TransactionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a credential token cannot be revoked or checked.
///
/// These are malformed-input failures: never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotRevocable {
    #[error("token carries no credentialStatus")]
    MissingStatus,

    #[error("unsupported status method: {0}")]
    UnsupportedMethod(String),

    #[error("malformed status locator: {0}")]
    MalformedLocator(String),

    #[error("token carries no credential id")]
    MissingId,

    #[error("token carries no issuer")]
    MissingIssuer,
}

/// Ledger-side failures of a submitted revocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// The transaction was mined but emitted no matching `Revoked` event.
    #[error("no Revoked event found in transaction {tx_hash}")]
    NoEventFound { tx_hash: String },

    /// The transaction was mined with a failure status.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    /// The ledger refused the call before inclusion (e.g. already revoked).
    #[error("rejected by registry: {0}")]
    Rejected(String),

    /// The transaction left the mempool without a receipt.
    #[error("transaction {tx_hash} dropped before confirmation")]
    Dropped { tx_hash: String },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, ProofError>;
