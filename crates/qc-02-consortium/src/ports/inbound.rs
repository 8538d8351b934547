//! Driving Ports (API - Inbound)

use crate::domain::errors::ConsortiumResult;
use qc_01_action_codec::Action;
use shared_types::Hash;

/// A payload that decoded and met quorum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedPayload {
    pub action: Action,
    pub payload_hash: Hash,
    /// Epoch of the set that signed it.
    pub epoch: u64,
    pub signed_weight: u64,
}

/// The gate every consuming module calls before acting on a payload.
///
/// Pure check: never mutates state.
pub trait PayloadVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], proof: &[u8]) -> ConsortiumResult<VerifiedPayload>;
}
