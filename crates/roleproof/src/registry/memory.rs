//! In-process registry ledger.
//!
//! Mirrors the registry contract's observable behaviour: each revoke is
//! mined in its own block, records are keyed by (registry, issuer,
//! identifier) with the issuer being the submitting caller, and a second
//! revoke of the same record is rejected. Handles created with
//! [`InMemoryRegistry::with_caller`] share one ledger.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{ProofError, Result, TransactionError};
use crate::identity::Identity;
use crate::status::{CredentialId, RegistryLocation};

use super::{RegistryConnector, RevokeReceipt, RevokedEvent};

type RecordKey = (RegistryLocation, Identity, String);

#[derive(Default)]
struct Ledger {
    height: u64,
    records: HashMap<RecordKey, u64>,
}

#[derive(Default)]
struct Switches {
    unavailable: AtomicBool,
    suppress_events: AtomicBool,
    calls: AtomicUsize,
}

/// A shared in-memory registry ledger bound to one caller identity.
#[derive(Clone)]
pub struct InMemoryRegistry {
    caller: Identity,
    ledger: Arc<Mutex<Ledger>>,
    switches: Arc<Switches>,
}

impl InMemoryRegistry {
    /// A fresh ledger at height 0.
    pub fn new(caller: Identity) -> Self {
        Self {
            caller,
            ledger: Arc::new(Mutex::new(Ledger::default())),
            switches: Arc::new(Switches::default()),
        }
    }

    /// Another handle on the same ledger, acting as `caller`.
    pub fn with_caller(&self, caller: Identity) -> Self {
        Self {
            caller,
            ledger: Arc::clone(&self.ledger),
            switches: Arc::clone(&self.switches),
        }
    }

    /// Simulate a transport outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.switches.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Accept revokes without emitting `Revoked` events.
    pub fn set_suppress_events(&self, suppress: bool) {
        self.switches.suppress_events.store(suppress, Ordering::SeqCst);
    }

    /// Number of ledger round-trips attempted through any handle.
    pub fn network_calls(&self) -> usize {
        self.switches.calls.load(Ordering::SeqCst)
    }

    /// Current ledger height.
    pub fn height(&self) -> u64 {
        self.ledger.lock().map(|l| l.height).unwrap_or_default()
    }

    fn enter(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.switches.calls.fetch_add(1, Ordering::SeqCst);
        if self.switches.unavailable.load(Ordering::SeqCst) {
            return Err(ProofError::RegistryUnavailable(
                "in-memory ledger offline".into(),
            ));
        }
        self.ledger
            .lock()
            .map_err(|_| ProofError::RegistryUnavailable("ledger state poisoned".into()))
    }
}

#[async_trait]
impl RegistryConnector for InMemoryRegistry {
    fn caller(&self) -> Identity {
        self.caller.clone()
    }

    async fn submit_revoke(
        &self,
        registry: &RegistryLocation,
        id: &CredentialId,
    ) -> Result<RevokeReceipt> {
        let mut ledger = self.enter()?;
        let key = (registry.clone(), self.caller.clone(), id.0.clone());
        if ledger.records.contains_key(&key) {
            return Err(TransactionError::Rejected(format!("credential {id} already revoked")).into());
        }

        ledger.height += 1;
        let height = ledger.height;
        ledger.records.insert(key, height);

        let events = if self.switches.suppress_events.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            vec![RevokedEvent {
                issuer: self.caller.clone(),
                credential_id: id.clone(),
            }]
        };

        Ok(RevokeReceipt {
            tx_hash: format!("0x{height:064x}"),
            block_number: Some(height),
            events,
        })
    }

    async fn revoked_at(
        &self,
        registry: &RegistryLocation,
        issuer: &Identity,
        identifier: &str,
    ) -> Result<u64> {
        let ledger = self.enter()?;
        let key = (registry.clone(), issuer.clone(), identifier.to_string());
        Ok(ledger.records.get(&key).copied().unwrap_or(0))
    }
}
