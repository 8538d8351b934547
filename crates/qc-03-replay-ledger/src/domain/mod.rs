//! # Domain Layer

pub mod batch;

use shared_types::{Address, Hash};
use std::fmt;
use thiserror::Error;

/// Identity of a consuming module instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub Address);

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Outcome of a consumption attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Consumption {
    /// First use in this scope; now recorded.
    Fresh,
    /// Already recorded; nothing changed.
    AlreadyUsed,
}

impl Consumption {
    pub fn is_fresh(self) -> bool {
        matches!(self, Consumption::Fresh)
    }

    /// Single-item consumers treat a replay as fatal.
    pub fn into_result(self, scope: ScopeId, payload_hash: Hash) -> Result<(), ReplayError> {
        match self {
            Consumption::Fresh => Ok(()),
            Consumption::AlreadyUsed => Err(ReplayError::PayloadAlreadyUsed {
                scope,
                payload_hash,
            }),
        }
    }
}

/// Replay errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Payload 0x{} already used in scope {scope}", hex::encode(.payload_hash))]
    PayloadAlreadyUsed { scope: ScopeId, payload_hash: Hash },
}
