//! # Validator Set
//!
//! An ordered, weighted list of notaries for one epoch. Order matters: proof
//! slots are matched to validators positionally.

use super::errors::{ConsortiumError, ConsortiumResult};
use qc_01_action_codec::NewValidatorSet;
use shared_crypto::EcdsaPublicKey;
use shared_types::Address;
use std::collections::HashSet;

/// A single notary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    pub public_key: EcdsaPublicKey,
    pub address: Address,
    pub weight: u64,
}

/// Validator set for one epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorSet {
    epoch: u64,
    validators: Vec<Validator>,
    total_weight: u64,
    quorum_numerator: u64,
    quorum_denominator: u64,
    threshold: u64,
    height: u64,
}

impl ValidatorSet {
    /// Build and validate a set from a decoded `NewValidatorSet` body.
    pub fn from_action(action: &NewValidatorSet, max_validators: usize) -> ConsortiumResult<Self> {
        let size = action.validators.len();
        if size == 0 || size > max_validators {
            return Err(ConsortiumError::InvalidValidatorSetSize {
                size,
                max: max_validators,
            });
        }

        let (numerator, denominator) = (action.quorum_numerator, action.quorum_denominator);
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(ConsortiumError::InvalidQuorum {
                numerator,
                denominator,
            });
        }

        let mut seen = HashSet::with_capacity(size);
        let mut validators = Vec::with_capacity(size);
        let mut total_weight: u64 = 0;

        for (index, entry) in action.validators.iter().enumerate() {
            if entry.weight == 0 {
                return Err(ConsortiumError::ZeroWeight { index });
            }
            let public_key = EcdsaPublicKey::from_slice(&entry.public_key)
                .map_err(|_| ConsortiumError::InvalidValidatorKey { index })?;
            let address = public_key.address();
            if !seen.insert(address) {
                return Err(ConsortiumError::DuplicateValidator { index });
            }
            total_weight = total_weight
                .checked_add(entry.weight)
                .ok_or(ConsortiumError::WeightOverflow)?;
            validators.push(Validator {
                public_key,
                address,
                weight: entry.weight,
            });
        }

        Ok(Self {
            epoch: action.epoch,
            validators,
            total_weight,
            quorum_numerator: numerator,
            quorum_denominator: denominator,
            threshold: quorum_threshold(total_weight, numerator, denominator),
            height: action.height,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Minimum signed weight for a proof to pass.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn quorum(&self) -> (u64, u64) {
        (self.quorum_numerator, self.quorum_denominator)
    }

    /// Addresses in slot order.
    pub fn addresses(&self) -> Vec<Address> {
        self.validators.iter().map(|v| v.address).collect()
    }
}

/// `ceil(total × numerator / denominator)`, in 128-bit so the product cannot
/// overflow. Rounds toward requiring more weight.
///
/// `denominator` must be non-zero and `numerator <= denominator`, so the
/// result never exceeds `total`.
pub fn quorum_threshold(total: u64, numerator: u64, denominator: u64) -> u64 {
    let product = u128::from(total) * u128::from(numerator);
    let den = u128::from(denominator);
    let threshold = product.div_ceil(den);
    u64::try_from(threshold).unwrap_or(u64::MAX)
}
