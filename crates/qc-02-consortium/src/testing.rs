//! Notary committee fixture for tests in this and downstream crates.

use crate::domain::proof::{ProofSlot, SignatureProof};
use qc_01_action_codec::{encode, payload_hash, NewValidatorSet, ValidatorEntry};
use shared_crypto::Secp256k1KeyPair;
use shared_types::Address;
use std::sync::Arc;

/// Freshly generated notary keys with weights, quorum 2/3.
pub struct NotaryCommittee {
    keys: Arc<Vec<Secp256k1KeyPair>>,
    weights: Vec<u64>,
}

impl NotaryCommittee {
    pub fn new(weights: &[u64]) -> Self {
        Self {
            keys: Arc::new(weights.iter().map(|_| Secp256k1KeyPair::generate()).collect()),
            weights: weights.to_vec(),
        }
    }

    /// Same keys, different weights.
    pub fn reweighted(&self, weights: &[u64]) -> Self {
        assert_eq!(weights.len(), self.keys.len());
        Self {
            keys: Arc::clone(&self.keys),
            weights: weights.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, index: usize) -> &Secp256k1KeyPair {
        &self.keys[index]
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.keys.iter().map(|k| k.address()).collect()
    }

    pub fn validator_set_action(&self, epoch: u64, height: u64) -> NewValidatorSet {
        NewValidatorSet {
            epoch,
            validators: self
                .keys
                .iter()
                .zip(&self.weights)
                .map(|(key, weight)| ValidatorEntry {
                    public_key: *key.public_key().as_bytes(),
                    weight: *weight,
                })
                .collect(),
            quorum_numerator: 2,
            quorum_denominator: 3,
            height,
        }
    }

    /// Encoded `NewValidatorSet` for this committee.
    pub fn validator_set_payload(&self, epoch: u64, height: u64) -> Vec<u8> {
        encode(&self.validator_set_action(epoch, height))
    }

    /// Every member signs.
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let all: Vec<usize> = (0..self.len()).collect();
        self.sign_with(payload, &all)
    }

    /// Only `signers` sign; other slots are absent.
    pub fn sign_with(&self, payload: &[u8], signers: &[usize]) -> Vec<u8> {
        let order: Vec<Option<usize>> = (0..self.len())
            .map(|i| signers.contains(&i).then_some(i))
            .collect();
        self.build(payload, &order)
    }

    /// Slot `i` is signed by key `order[i]`.
    pub fn sign_permuted(&self, payload: &[u8], order: &[usize]) -> Vec<u8> {
        let order: Vec<Option<usize>> = order.iter().map(|i| Some(*i)).collect();
        self.build(payload, &order)
    }

    fn build(&self, payload: &[u8], order: &[Option<usize>]) -> Vec<u8> {
        let hash = payload_hash(payload);
        let slots = order
            .iter()
            .map(|signer| match signer {
                Some(i) => ProofSlot::Signed(
                    self.keys[*i]
                        .sign_prehash(&hash)
                        .expect("prehash signing"),
                ),
                None => ProofSlot::Absent,
            })
            .collect();
        SignatureProof::new(slots).encode()
    }
}
