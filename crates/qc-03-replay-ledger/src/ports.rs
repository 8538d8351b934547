//! # Ports

use crate::domain::{Consumption, ReplayError, ScopeId};
use shared_types::Hash;

/// Consumption record shared by every consuming module.
pub trait ReplayLedger: Send + Sync {
    /// Atomically record `payload_hash` in `scope` unless already present.
    fn try_consume(&self, scope: ScopeId, payload_hash: Hash) -> Consumption;

    /// Record every hash, or none if any is already present.
    fn try_consume_all(&self, scope: ScopeId, payload_hashes: &[Hash]) -> Result<(), ReplayError>;

    /// Drop a record made by the caller's own `try_consume` whose effects
    /// could not be applied. Returns whether the hash was recorded.
    fn release(&self, scope: ScopeId, payload_hash: &Hash) -> bool;

    /// Read-only query.
    fn is_consumed(&self, scope: ScopeId, payload_hash: &Hash) -> bool;
}
