//! # In-Memory Replay Ledger
//!
//! Exact (non-probabilistic) set of `(scope, hash)` pairs behind one mutex,
//! so check and insert happen under the same lock.

use crate::domain::{Consumption, ReplayError, ScopeId};
use crate::ports::ReplayLedger;
use parking_lot::Mutex;
use shared_types::Hash;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct LedgerState {
    consumed: HashSet<(ScopeId, Hash)>,
    total_checked: u64,
    replays_detected: u64,
}

/// Ledger used by the runtime and by tests.
#[derive(Debug, Default)]
pub struct InMemoryReplayLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryReplayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get statistics.
    pub fn stats(&self) -> ReplayLedgerStats {
        let state = self.state.lock();
        ReplayLedgerStats {
            total_checked: state.total_checked,
            replays_detected: state.replays_detected,
            consumed_entries: state.consumed.len(),
        }
    }
}

impl ReplayLedger for InMemoryReplayLedger {
    fn try_consume(&self, scope: ScopeId, payload_hash: Hash) -> Consumption {
        let mut state = self.state.lock();
        state.total_checked += 1;

        if state.consumed.insert((scope, payload_hash)) {
            debug!(%scope, payload_hash = %hex::encode(payload_hash), "[qc-03] Payload consumed");
            Consumption::Fresh
        } else {
            state.replays_detected += 1;
            warn!(%scope, payload_hash = %hex::encode(payload_hash), "[qc-03] Replay detected");
            Consumption::AlreadyUsed
        }
    }

    fn try_consume_all(&self, scope: ScopeId, payload_hashes: &[Hash]) -> Result<(), ReplayError> {
        let mut state = self.state.lock();
        state.total_checked += payload_hashes.len() as u64;

        let mut pending = HashSet::with_capacity(payload_hashes.len());
        for hash in payload_hashes {
            if state.consumed.contains(&(scope, *hash)) || !pending.insert(*hash) {
                state.replays_detected += 1;
                warn!(%scope, payload_hash = %hex::encode(hash), "[qc-03] Replay detected in set");
                return Err(ReplayError::PayloadAlreadyUsed {
                    scope,
                    payload_hash: *hash,
                });
            }
        }
        state
            .consumed
            .extend(pending.into_iter().map(|hash| (scope, hash)));
        debug!(%scope, count = payload_hashes.len(), "[qc-03] Payload set consumed");
        Ok(())
    }

    fn release(&self, scope: ScopeId, payload_hash: &Hash) -> bool {
        let released = self.state.lock().consumed.remove(&(scope, *payload_hash));
        if released {
            warn!(%scope, payload_hash = %hex::encode(payload_hash), "[qc-03] Consumption released");
        }
        released
    }

    fn is_consumed(&self, scope: ScopeId, payload_hash: &Hash) -> bool {
        self.state.lock().consumed.contains(&(scope, *payload_hash))
    }
}

/// Ledger statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayLedgerStats {
    /// Consumption attempts
    pub total_checked: u64,
    /// Attempts that found the hash already recorded
    pub replays_detected: u64,
    /// Recorded pairs
    pub consumed_entries: usize,
}
