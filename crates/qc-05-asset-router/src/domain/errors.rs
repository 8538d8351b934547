//! Error types for the asset router.

use qc_01_action_codec::CodecError;
use qc_02_consortium::ConsortiumError;
use qc_03_replay_ledger::ReplayError;
use shared_types::{AccessError, ChainId, LedgerError, TokenId};
use thiserror::Error;

/// Router errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
    /// No route from this token to the requested chain
    #[error("Staking not allowed: no route from {from_token} to chain {to_chain}")]
    StakingNotAllowed { from_token: TokenId, to_chain: ChainId },

    /// Symbolic token name never registered
    #[error("Unknown named token: {name}")]
    UnknownNamedToken { name: String },

    /// Net amount does not clear the dust limit
    #[error("Amount below dust limit: {amount_after_fee} <= {dust_limit}")]
    AmountBelowDustLimit { amount_after_fee: u64, dust_limit: u64 },

    /// Amount does not exceed the commission
    #[error("Amount {amount} less than commission {commission}")]
    AmountLessThanCommission { amount: u64, commission: u64 },

    /// Destination script is not P2WPKH, P2WSH or P2TR
    #[error("Unsupported scriptPubKey")]
    ScriptPubkeyUnsupported,

    /// Receipt names a different chain
    #[error("Wrong chain: expected {expected}, got {actual}")]
    WrongChain { expected: ChainId, actual: ChainId },

    #[error("Zero amount")]
    ZeroAmount,

    #[error(transparent)]
    Consortium(#[from] ConsortiumError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Result type for router operations
pub type RouterResult<T> = Result<T, RouterError>;
