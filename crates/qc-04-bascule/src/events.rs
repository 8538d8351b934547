//! Outgoing bascule events.

use crate::domain::deposit::DepositId;
use serde::Serialize;
use shared_types::{Address, Hash};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BasculeEvent {
    DepositsReported { report_id: Hash, count: usize },
    DepositAlreadyReported { deposit_id: DepositId },
    WithdrawalValidated { deposit_id: DepositId, amount: u64 },
    WithdrawalNotValidated { deposit_id: DepositId, amount: u64 },
    ValidateThresholdUpdated { old: u64, new: u64 },
    MaxDepositsUpdated { old: usize, new: usize },
    TrustedSignerUpdated { old: Address, new: Address },
    Paused { account: Address },
    Unpaused { account: Address },
}
