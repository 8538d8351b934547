//! Error types for the deposit notarization gate.

use super::deposit::DepositId;
use shared_types::{AccessError, PauseError};
use thiserror::Error;

/// Bascule errors. Every failure leaves deposit state unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BasculeError {
    /// Report batch exceeds `max_deposits`
    #[error("Bad deposit report: {count} deposits exceeds max {max}")]
    BadDepositReport { count: usize, max: usize },

    /// Deposit and proof arrays differ in length
    #[error("Bad deposit proofs size: {deposits} deposits, {proofs} proofs")]
    BadDepositProofsSize { deposits: usize, proofs: usize },

    /// Per-deposit proof is not a trusted-signer signature over the id
    #[error("Bad deposit proof for 0x{}: {reason}", hex::encode(.deposit_id))]
    BadDepositProof { deposit_id: DepositId, reason: String },

    /// At or above threshold and not reported
    #[error("Withdrawal failed validation for 0x{}: amount {amount}, threshold {threshold}", hex::encode(.deposit_id))]
    WithdrawalFailedValidation {
        deposit_id: DepositId,
        amount: u64,
        threshold: u64,
    },

    /// Deposit already released
    #[error("Already withdrawn: 0x{}", hex::encode(.deposit_id))]
    AlreadyWithdrawn { deposit_id: DepositId },

    /// Threshold update to the current value
    #[error("Same validation threshold: {value}")]
    SameValidationThreshold { value: u64 },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Pause(#[from] PauseError),
}

/// Result type for bascule operations
pub type BasculeResult<T> = Result<T, BasculeError>;
