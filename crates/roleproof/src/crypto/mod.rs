//! Cryptographic primitives for RoleProof.
//!
//! This module provides:
//! - Canonical claim encoding (the exact bytes that get signed)
//! - secp256k1 recoverable signing behind the [`signing::ClaimSigner`] seam
//! - Signer address recovery for verification

pub mod encoding;
pub mod signing;

pub use encoding::{encode, CanonicalClaim};
pub use signing::{recover_signer, ClaimSigner, LocalKey, SignedProof};
