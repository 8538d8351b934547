//! Driving Ports (API - Inbound)

use crate::domain::deposit::{DepositId, WithdrawalOutcome};
use crate::domain::errors::BasculeResult;
use shared_types::Address;

/// What a consuming module needs from the gate before releasing funds.
pub trait WithdrawalGate: Send + Sync {
    /// Predict [`Self::validate_withdrawal`] for `caller` without changing state.
    fn check_withdrawal(
        &self,
        caller: &Address,
        deposit_id: &DepositId,
        amount: u64,
    ) -> BasculeResult<WithdrawalOutcome>;

    /// Mark the deposit withdrawn, or fail.
    fn validate_withdrawal(
        &self,
        caller: &Address,
        deposit_id: DepositId,
        amount: u64,
    ) -> BasculeResult<WithdrawalOutcome>;
}
