//! Canonical claim encoding.
//!
//! Issuer and verifier may live in different runtimes, so the signed bytes
//! must not depend on field declaration order or number formatting. A claim
//! is encoded as a compact JSON object whose keys are sorted
//! lexicographically; timestamps are base-10 integer milliseconds and
//! addresses are copied verbatim.

use std::collections::BTreeMap;

use serde_json::Value;

/// A claim that can be reduced to its canonical key/value form.
pub trait CanonicalClaim {
    /// The claim's wire fields. Key order of the returned map is the encoding order.
    fn canonical_fields(&self) -> BTreeMap<&'static str, Value>;
}

/// Encode a claim into the bytes that are signed and later recovered against.
pub fn encode(claim: &impl CanonicalClaim) -> Vec<u8> {
    serde_json::to_vec(&claim.canonical_fields()).unwrap_or_default()
}
