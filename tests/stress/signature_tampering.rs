//! Stress test: every single-byte mutation of either signature in a role
//! proof must be rejected, and never with a panic.

use roleproof::time::DAY_MS;
use roleproof::{
    build_membership_proof, build_role_proof, verify, ClaimSigner, CredentialFingerprint, Identity,
    LocalKey, Rejection, RoleProof, SignedProof, VerificationResult,
};

const T: u64 = 1_700_000_000_000;

fn fixture() -> (RoleProof, Identity) {
    let issuer = LocalKey::random();
    let org = LocalKey::random();
    let membership = build_membership_proof(
        &issuer,
        org.address(),
        CredentialFingerprint::of_credential("org"),
        T + 30 * DAY_MS,
    )
    .unwrap();
    let proof = build_role_proof(
        &org,
        LocalKey::random().address(),
        "operator",
        CredentialFingerprint::of_credential("delegate"),
        T + 30 * DAY_MS,
        membership,
    )
    .unwrap();
    (proof, issuer.address())
}

fn mutate(signature: &SignedProof, index: usize, mask: u8) -> SignedProof {
    let mut bytes = signature.to_bytes().unwrap();
    bytes[index] ^= mask;
    SignedProof(format!("0x{}", hex::encode(bytes)))
}

#[test]
fn stress_every_membership_signature_byte() {
    let (proof, trusted) = fixture();
    assert!(verify(&proof, &trusted, T).is_accepted());

    for index in 0..65 {
        for mask in [0x01u8, 0x80, 0xff] {
            let mut tampered = proof.clone();
            tampered.membership_proof.signed_proof =
                mutate(&proof.membership_proof.signed_proof, index, mask);
            assert_eq!(
                verify(&tampered, &trusted, T),
                VerificationResult::Rejected(Rejection::IssuerMismatch),
                "membership byte {index} mask {mask:#04x} should be rejected"
            );
        }
    }
}

#[test]
fn stress_every_role_signature_byte() {
    let (proof, trusted) = fixture();

    for index in 0..65 {
        for mask in [0x01u8, 0x80, 0xff] {
            let mut tampered = proof.clone();
            tampered.signed_proof = mutate(&proof.signed_proof, index, mask);
            assert_eq!(
                verify(&tampered, &trusted, T),
                VerificationResult::Rejected(Rejection::DelegatorMismatch),
                "role byte {index} mask {mask:#04x} should be rejected"
            );
        }
    }
}

#[test]
fn stress_malformed_signatures() {
    let (proof, trusted) = fixture();
    let full = proof.signed_proof.as_str().to_string();

    let malformed = [
        String::new(),
        "0x".to_string(),
        "not hex at all".to_string(),
        full[..full.len() - 2].to_string(),
        format!("{full}00"),
        format!("0x{}", "00".repeat(65)),
    ];

    for signature in malformed {
        let mut tampered = proof.clone();
        tampered.signed_proof = SignedProof(signature.clone());
        assert_eq!(
            verify(&tampered, &trusted, T),
            VerificationResult::Rejected(Rejection::DelegatorMismatch),
            "signature {signature:?} should be rejected"
        );
    }
}

#[test]
fn stress_claim_field_tampering() {
    let (proof, trusted) = fixture();

    let mut later = proof.clone();
    later.claim.delegate_credential_expiry += 1;
    assert!(!verify(&later, &trusted, T).is_accepted());

    let mut other_delegate = proof.clone();
    other_delegate.claim.delegate_address = LocalKey::random().address();
    assert!(!verify(&other_delegate, &trusted, T).is_accepted());

    let mut other_org = proof.clone();
    other_org.membership_proof.claim.delegator_address = LocalKey::random().address();
    assert_eq!(
        verify(&other_org, &trusted, T),
        VerificationResult::Rejected(Rejection::IssuerMismatch)
    );

    let mut other_fingerprint = proof.clone();
    other_fingerprint.membership_proof.claim.delegator_credential_fingerprint =
        CredentialFingerprint::new("0x00");
    assert_eq!(
        verify(&other_fingerprint, &trusted, T),
        VerificationResult::Rejected(Rejection::IssuerMismatch)
    );
}
