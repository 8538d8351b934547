//! # Error Types
//!
//! Errors shared by every module that checks roles, honours the pause switch
//! or moves balances through the token-ledger port.

use crate::entities::{Address, TokenId};
use crate::security::Role;
use thiserror::Error;

/// Authorization failures. Always fatal; identifies the missing role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The caller does not hold the role required by the entry point.
    #[error("Unauthorized: account 0x{} is missing role {role}", hex::encode(.account))]
    MissingRole { role: Role, account: Address },

    /// A one-shot capability was already exercised (or never issued).
    #[error("Unauthorized: account 0x{} holds no unused {role} capability", hex::encode(.account))]
    CapabilityUnavailable { role: Role, account: Address },
}

/// Availability failures raised by the pause switch.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PauseError {
    /// A mutating entry point was called while paused.
    #[error("EnforcedPause: operation rejected while paused")]
    EnforcedPause,

    /// Unpause was requested while not paused.
    #[error("ExpectedPause: operation requires the paused state")]
    ExpectedPause,
}

/// Token-ledger failures surfaced by the external bookkeeping collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Burn amount exceeds the account balance.
    #[error("Insufficient balance for {token}: have {balance}, need {needed}")]
    InsufficientBalance {
        token: TokenId,
        balance: u64,
        needed: u64,
    },

    /// Balance or supply would overflow.
    #[error("Supply overflow for {token}")]
    Overflow { token: TokenId },
}
