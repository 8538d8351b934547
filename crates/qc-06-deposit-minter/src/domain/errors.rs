//! Error types for the deposit minter.

use qc_01_action_codec::CodecError;
use qc_02_consortium::ConsortiumError;
use qc_03_replay_ledger::ReplayError;
use qc_04_bascule::BasculeError;
use qc_05_asset_router::RouterError;
use shared_types::{AccessError, ChainId, LedgerError, PauseError, TokenId};
use thiserror::Error;

/// Minter errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MinterError {
    /// Deposit addressed to another chain
    #[error("Wrong chain: expected {expected}, got {actual}")]
    WrongChain { expected: ChainId, actual: ChainId },

    /// V1 deposit names a token this minter does not issue
    #[error("Wrong token: expected {expected}, got {actual}")]
    WrongToken { expected: TokenId, actual: TokenId },

    #[error("Zero amount")]
    ZeroAmount,

    #[error("Zero recipient")]
    ZeroRecipient,

    /// Fee approval not signed by the deposit recipient
    #[error("Invalid user signature")]
    InvalidUserSignature,

    /// Fee approval used after its deadline
    #[error("User signature expired: deadline {deadline}, now {now}")]
    UserSignatureExpired { deadline: u64, now: u64 },

    #[error("Fee {fee} not less than amount {amount}")]
    FeeGreaterThanAmount { fee: u64, amount: u64 },

    #[error("Withdrawals disabled")]
    WithdrawalsDisabled,

    /// Batch arrays differ in length
    #[error("Non-equal batch lengths: {payloads} payloads, {other} companions")]
    NonEqualLength { payloads: usize, other: usize },

    #[error(transparent)]
    Consortium(#[from] ConsortiumError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Bascule(#[from] BasculeError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Pause(#[from] PauseError),
}

/// Result type for minter operations
pub type MinterResult<T> = Result<T, MinterError>;
