//! # Deposit Lifecycle
//!
//! `Unreported -> Reported -> Withdrawn`, plus the below-threshold shortcut
//! `Unreported -> Withdrawn`. Never backward.

use serde::Serialize;
use shared_types::Hash;

/// 32-byte deposit identifier.
pub type DepositId = Hash;

/// The state of a deposit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DepositState {
    /// The default state
    #[default]
    Unreported,
    /// Reported by the deposit reporter
    Reported,
    /// Released to the withdrawer
    Withdrawn,
}

impl DepositState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: DepositState) -> bool {
        matches!(
            (self, next),
            (Self::Unreported, Self::Reported)
                | (Self::Reported, Self::Withdrawn)
                | (Self::Unreported, Self::Withdrawn)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn)
    }
}

/// How a permitted withdrawal was justified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WithdrawalOutcome {
    /// The deposit had been reported.
    Validated,
    /// Below the validation threshold; released without a report.
    NotValidated,
}
