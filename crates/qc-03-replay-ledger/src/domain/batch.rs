//! Batch planning: which items of a batch are still fresh in a scope.

use super::ScopeId;
use crate::ports::ReplayLedger;
use shared_types::Hash;
use std::collections::HashSet;

/// Split of batch positions into fresh and skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchPlan {
    /// Positions to apply, in batch order
    pub fresh: Vec<usize>,
    /// Positions already consumed, or repeating an earlier item
    pub skipped: Vec<usize>,
}

impl BatchPlan {
    /// Hashes of the fresh positions.
    pub fn fresh_hashes(&self, hashes: &[Hash]) -> Vec<Hash> {
        self.fresh.iter().map(|&i| hashes[i]).collect()
    }
}

/// Classify `hashes` against `ledger` without recording anything.
///
/// The first occurrence of a hash not yet consumed in `scope` is fresh;
/// every later occurrence is skipped.
pub fn plan_batch(ledger: &dyn ReplayLedger, scope: ScopeId, hashes: &[Hash]) -> BatchPlan {
    let mut seen = HashSet::with_capacity(hashes.len());
    let mut plan = BatchPlan::default();
    for (i, hash) in hashes.iter().enumerate() {
        if seen.insert(*hash) && !ledger.is_consumed(scope, hash) {
            plan.fresh.push(i);
        } else {
            plan.skipped.push(i);
        }
    }
    plan
}
