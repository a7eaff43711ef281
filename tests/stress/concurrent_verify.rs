//! Concurrency test: parallel proof issuance, verification and revocation.
//!
//! Validates that verification is thread-safe and deterministic, and that
//! the shared ledger records concurrent revocations exactly once.

use std::sync::{Arc, Mutex};
use std::thread;

use roleproof::time::DAY_MS;
use roleproof::{
    build_membership_proof, build_role_proof, verify, ClaimSigner, CredentialFingerprint, Identity,
    InMemoryRegistry, LocalKey, ProofError, RegistryLocation, Rejection, RevocationClient,
    TransactionError, VerificationResult,
};

const T: u64 = 1_700_000_000_000;

#[test]
fn stress_50_threads_verify_shared_proof() {
    let issuer = LocalKey::random();
    let org = LocalKey::random();
    let membership = build_membership_proof(
        &issuer,
        org.address(),
        CredentialFingerprint::of_credential("org"),
        T + 30 * DAY_MS,
    )
    .unwrap();
    let proof = Arc::new(
        build_role_proof(
            &org,
            LocalKey::random().address(),
            "operator",
            CredentialFingerprint::of_credential("delegate"),
            T + 30 * DAY_MS,
            membership,
        )
        .unwrap(),
    );
    let trusted = Arc::new(issuer.address());

    let mut handles = Vec::new();
    for thread_id in 0..50u64 {
        let proof = Arc::clone(&proof);
        let trusted = Arc::clone(&trusted);
        handles.push(thread::spawn(move || {
            for i in 0..20u64 {
                let now = T + (thread_id * 20 + i) * DAY_MS / 100;
                assert_eq!(verify(&proof, &trusted, now), VerificationResult::Accepted);
            }
            assert_eq!(
                verify(&proof, &trusted, T + 30 * DAY_MS),
                VerificationResult::Rejected(Rejection::Expired)
            );
        }));
    }

    for h in handles {
        h.join().expect("verifier thread panicked");
    }
}

#[test]
fn stress_concurrent_issuance_by_one_org() {
    let issuer = Arc::new(LocalKey::random());
    let org = Arc::new(LocalKey::random());
    let membership = Arc::new(
        build_membership_proof(
            issuer.as_ref(),
            org.address(),
            CredentialFingerprint::of_credential("org"),
            T + 30 * DAY_MS,
        )
        .unwrap(),
    );
    let proofs = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for thread_id in 0..16 {
        let org = Arc::clone(&org);
        let membership = Arc::clone(&membership);
        let proofs = Arc::clone(&proofs);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let proof = build_role_proof(
                    org.as_ref(),
                    LocalKey::random().address(),
                    format!("role-{thread_id}-{i}"),
                    CredentialFingerprint::of_credential(format!("{thread_id}/{i}")),
                    T + DAY_MS,
                    membership.as_ref().clone(),
                )
                .expect("signing should succeed");
                proofs.lock().unwrap().push(proof);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let proofs = proofs.lock().unwrap();
    assert_eq!(proofs.len(), 160);
    let trusted = issuer.address();
    for proof in proofs.iter() {
        assert!(verify(proof, &trusted, T).is_accepted());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_concurrent_duplicate_revocations() {
    let ledger = InMemoryRegistry::new(Identity::new("0xIssuer"));
    let registry = RegistryLocation::new("hardhat", Identity::new("0xRegistry"));
    let fingerprint = CredentialFingerprint::of_credential("contested");

    let mut tasks = Vec::new();
    for _ in 0..32 {
        let client = RevocationClient::new(ledger.clone());
        let registry = registry.clone();
        let fingerprint = fingerprint.clone();
        tasks.push(tokio::spawn(async move {
            client.revoke_fingerprint(&registry, &fingerprint).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(ProofError::TransactionError(TransactionError::Rejected(_))) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(rejected, 31);
    assert_eq!(ledger.height(), 1);
}
