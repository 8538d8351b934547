//! # Weighted Quorum
//!
//! A slot counts toward quorum only if its signature recovers to the
//! validator at the same position. A well-formed signature by anyone else
//! adds nothing; a malformed one fails the whole proof.

use super::errors::{ConsortiumError, ConsortiumResult};
use super::proof::{ProofSlot, SignatureProof};
use super::validator_set::ValidatorSet;
use shared_crypto::signer_matches;
use shared_types::Hash;

/// Sum of weights whose slot carries a matching signature over `hash`.
pub fn signed_weight(set: &ValidatorSet, hash: &Hash, proof: &SignatureProof) -> ConsortiumResult<u64> {
    if proof.len() != set.len() {
        return Err(ConsortiumError::SignatureCountMismatch {
            expected: set.len(),
            actual: proof.len(),
        });
    }

    let mut weight: u64 = 0;
    for (index, (slot, validator)) in proof.slots().iter().zip(set.validators()).enumerate() {
        let ProofSlot::Signed(signature) = slot else {
            continue;
        };
        let matches = signer_matches(hash, signature, &validator.address).map_err(|e| {
            ConsortiumError::BadProof {
                reason: format!("slot {index}: {e}"),
            }
        })?;
        if matches {
            // Bounded by total_weight, which fits in u64
            weight = weight.saturating_add(validator.weight);
        }
    }
    Ok(weight)
}

/// Fails `NotEnoughSignatures` unless the signed weight reaches the threshold.
pub fn check_quorum(set: &ValidatorSet, hash: &Hash, proof: &SignatureProof) -> ConsortiumResult<u64> {
    let signed = signed_weight(set, hash, proof)?;
    if signed < set.threshold() {
        return Err(ConsortiumError::NotEnoughSignatures {
            signed,
            required: set.threshold(),
        });
    }
    Ok(signed)
}
