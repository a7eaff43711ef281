//! secp256k1 signing and signer recovery.
//!
//! Messages are hashed as EIP-191 personal messages and signed into
//! 65-byte `r || s || v` signatures (`v` is 27 or 28), hex-encoded with a
//! `0x` prefix. Verification never needs the public key: the signer's
//! address is recovered from the signature itself.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Signature};
use ethers::utils::hash_message;
use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};
use crate::identity::Identity;

/// A hex-encoded recoverable signature over a canonical claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedProof(pub String);

impl SignedProof {
    pub fn from_signature(signature: &Signature) -> Self {
        Self(format!("0x{}", hex::encode(signature.to_vec())))
    }

    /// Decode to raw bytes. Returns `None` for anything that is not hex.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        hex::decode(digits).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A ready-to-use signing capability.
///
/// Key custody belongs to the identity-bridging layer; anything that can
/// produce recoverable signatures for a fixed address can issue proofs.
pub trait ClaimSigner: Send + Sync {
    /// The identity recovered from this signer's signatures.
    fn address(&self) -> Identity;

    /// Sign `message` as an EIP-191 personal message.
    fn sign_message(&self, message: &[u8]) -> Result<SignedProof>;
}

/// A locally held secp256k1 key.
#[derive(Clone)]
pub struct LocalKey {
    wallet: LocalWallet,
}

impl LocalKey {
    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self {
            wallet: LocalWallet::new(&mut rand::thread_rng()),
        }
    }

    /// Load a key from 64 hex digits, with or without `0x`.
    pub fn from_hex(private_key: &str) -> Result<Self> {
        let digits = private_key
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key.trim());
        let bytes =
            hex::decode(digits).map_err(|e| ProofError::InvalidKey(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Load a key from 32 raw scalar bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(ProofError::InvalidKey("private key must be 32 bytes".into()));
        }
        let wallet = LocalWallet::from_bytes(bytes)
            .map_err(|e| ProofError::InvalidKey(format!("invalid secp256k1 scalar: {e}")))?;
        Ok(Self { wallet })
    }

    /// Export the private key as `0x`-prefixed hex. Handle with care.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.wallet.signer().to_bytes()))
    }

    /// The underlying wallet, for transaction signing.
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

impl std::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl ClaimSigner for LocalKey {
    fn address(&self) -> Identity {
        Identity::from_address(self.wallet.address())
    }

    fn sign_message(&self, message: &[u8]) -> Result<SignedProof> {
        let signature = self
            .wallet
            .sign_hash(hash_message(message))
            .map_err(|e| ProofError::SigningError(e.to_string()))?;
        Ok(SignedProof::from_signature(&signature))
    }
}

/// Recover the address that signed `message`.
///
/// Returns `None` for anything other than a canonical 65-byte signature
/// with `v` of 27 or 28, or when recovery fails.
pub fn recover_signer(message: &[u8], proof: &SignedProof) -> Option<Address> {
    let bytes = proof.to_bytes()?;
    if bytes.len() != 65 || !matches!(bytes[64], 27 | 28) {
        return None;
    }
    let signature = Signature::try_from(bytes.as_slice()).ok()?;
    signature.recover(hash_message(message)).ok()
}
