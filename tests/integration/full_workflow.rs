//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Issuer vouches for an organization (membership proof)
//! 2. Organization grants a role to a delegate (role proof)
//! 3. Proof travels as JSON and verifies on the far side
//! 4. Expiry and tampering are rejected
//! 5. Credentials are revoked and the revocation is observed

use roleproof::time::DAY_MS;
use roleproof::{
    build_membership_proof, build_role_proof, verify, Authorization, ClaimSigner,
    CredentialFingerprint, CredentialToken, Identity, InMemoryRegistry, LocalKey, NotRevocable,
    ProofError, RegistryLocation, Rejection, RevocationClient, RoleProof, VerificationResult,
};

const T: u64 = 1_700_000_000_000;

#[test]
fn full_workflow_issue_transport_verify() {
    // ── Step 1: Keys ────────────────────────────────────────────────────
    let issuer = LocalKey::random();
    let org = LocalKey::random();
    let delegate = LocalKey::random();
    assert_ne!(issuer.address(), org.address());
    assert!(org.address().as_str().starts_with("0x"));

    // ── Step 2: Membership proof ────────────────────────────────────────
    let membership = build_membership_proof(
        &issuer,
        org.address(),
        CredentialFingerprint::of_credential("org-credential.jwt"),
        T + 30 * DAY_MS,
    )
    .expect("issuer signing should succeed");
    assert_eq!(membership.claim.issuer, issuer.address());

    // ── Step 3: Role proof ──────────────────────────────────────────────
    let proof = build_role_proof(
        &org,
        delegate.address(),
        "operator",
        CredentialFingerprint::of_credential("delegate-credential.jwt"),
        T + 30 * DAY_MS,
        membership,
    )
    .expect("organization signing should succeed");

    // ── Step 4: Transport ───────────────────────────────────────────────
    let wire = proof.to_json().unwrap();
    let received = RoleProof::from_json(&wire).unwrap();
    assert_eq!(received, proof);

    let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(value["role"], "operator");
    assert!(value["membershipProof"]["delegatorCredentialExpiryDate"].is_u64());

    // ── Step 5: Verify over time ────────────────────────────────────────
    let trusted = issuer.address();
    assert_eq!(
        verify(&received, &trusted, T + DAY_MS),
        VerificationResult::Accepted
    );
    assert_eq!(
        verify(&received, &trusted, T + 30 * DAY_MS),
        VerificationResult::Rejected(Rejection::Expired)
    );
    assert_eq!(
        verify(&received, &trusted, T + 31 * DAY_MS),
        VerificationResult::Rejected(Rejection::Expired)
    );

    // ── Step 6: Wrong trust anchor ──────────────────────────────────────
    assert_eq!(
        verify(&received, &org.address(), T + DAY_MS),
        VerificationResult::Rejected(Rejection::IssuerMismatch)
    );

    // ── Step 7: Delegate tries to promote itself ────────────────────────
    let mut forged = received.clone();
    forged.claim.role = "admin".to_string();
    assert_eq!(
        verify(&forged, &trusted, T + DAY_MS),
        VerificationResult::Rejected(Rejection::DelegatorMismatch)
    );
}

#[test]
fn full_workflow_self_issued_scenario() {
    // The organization acts as its own trusted issuer.
    let org = LocalKey::random();
    let delegate = LocalKey::random();

    let membership = build_membership_proof(
        &org,
        org.address(),
        CredentialFingerprint::new("0xaa"),
        T + 365 * DAY_MS,
    )
    .unwrap();
    assert_eq!(membership.claim.issuer, membership.claim.delegator_address);

    let proof = build_role_proof(
        &org,
        delegate.address(),
        "Signer",
        CredentialFingerprint::new("0xbb"),
        T + 30 * DAY_MS,
        membership,
    )
    .unwrap();

    assert_eq!(
        verify(&proof, &org.address(), T + DAY_MS),
        VerificationResult::Accepted
    );
    assert_eq!(
        verify(&proof, &org.address(), T + 31 * DAY_MS),
        VerificationResult::Rejected(Rejection::Expired)
    );
    assert_eq!(
        verify(&proof, &delegate.address(), T + DAY_MS),
        VerificationResult::Rejected(Rejection::IssuerMismatch)
    );
}

#[test]
fn full_workflow_rogue_organization_rejected() {
    let issuer = LocalKey::random();
    let org = LocalKey::random();
    let rogue = LocalKey::random();

    let membership = build_membership_proof(
        &issuer,
        org.address(),
        CredentialFingerprint::new("0x01"),
        T + 30 * DAY_MS,
    )
    .unwrap();

    // A different organization reuses someone else's membership proof.
    let proof = build_role_proof(
        &rogue,
        LocalKey::random().address(),
        "operator",
        CredentialFingerprint::new("0x02"),
        T + 30 * DAY_MS,
        membership,
    )
    .unwrap();

    assert_eq!(
        verify(&proof, &issuer.address(), T),
        VerificationResult::Rejected(Rejection::DelegatorMismatch)
    );
}

#[tokio::test]
async fn full_workflow_token_revocation() {
    let ledger = InMemoryRegistry::new(Identity::new("0xIssuer"));
    let client = RevocationClient::new(ledger.clone());

    let token = CredentialToken::from_json(
        r#"{
            "iss": "did:ethr:dev:0xIssuer",
            "vc": {
                "id": 7,
                "credentialStatus": {"type": "EthrStatusRegistry2019", "id": "hardhat:0xRegistry"}
            }
        }"#,
    )
    .unwrap();

    // ── Before revocation ───────────────────────────────────────────────
    let status = client.check_revoked(&token).await.unwrap();
    assert!(!status.revoked);

    // ── Revoke ──────────────────────────────────────────────────────────
    let id = client.revoke(&token).await.unwrap();
    assert_eq!(id.as_str(), "7");

    // ── After revocation ────────────────────────────────────────────────
    let status = client.check_revoked(&token).await.unwrap();
    assert!(status.revoked);
    assert_eq!(status.block_number, Some(ledger.height()));

    // ── Not revocable ───────────────────────────────────────────────────
    let calls = ledger.network_calls();
    let bare = CredentialToken::from_json(r#"{"id":"8","iss":"did:ethr:0xIssuer"}"#).unwrap();
    assert!(matches!(
        client.check_revoked(&bare).await,
        Err(ProofError::NotRevocable(NotRevocable::MissingStatus))
    ));
    assert_eq!(ledger.network_calls(), calls);
}

#[tokio::test]
async fn full_workflow_live_authorization() {
    let issuer = LocalKey::random();
    let org = LocalKey::random();
    let registry = RegistryLocation::new("hardhat", Identity::new("0xRegistry"));

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
        "auditor",
        CredentialFingerprint::of_credential("delegate"),
        T + 30 * DAY_MS,
        membership,
    )
    .unwrap();

    let ledger = InMemoryRegistry::new(org.address());
    let verifier = RevocationClient::new(ledger.clone());
    assert_eq!(
        verifier
            .authorize(&proof, &issuer.address(), T + DAY_MS, &registry)
            .await
            .unwrap(),
        Authorization::Granted
    );

    // The issuer withdraws the organization's membership credential.
    let issuer_client = RevocationClient::new(ledger.with_caller(issuer.address()));
    let fingerprint = proof
        .membership_proof
        .claim
        .delegator_credential_fingerprint
        .clone();
    issuer_client
        .revoke_fingerprint(&registry, &fingerprint)
        .await
        .unwrap();

    assert_eq!(
        verifier
            .authorize(&proof, &issuer.address(), T + DAY_MS, &registry)
            .await
            .unwrap(),
        Authorization::Revoked(fingerprint)
    );

    // Offline verification is unaffected by revocation.
    assert!(verify(&proof, &issuer.address(), T + DAY_MS).is_accepted());
}
