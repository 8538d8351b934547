//! Outgoing minter events.

use serde::Serialize;
use shared_types::{Address, Hash};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MinterEvent {
    /// A notarized deposit was honoured.
    MintProofConsumed {
        recipient: Address,
        payload_hash: Hash,
        amount: u64,
    },
    /// A batch item had already been consumed and was passed over.
    BatchMintSkipped { payload_hash: Hash },
    FeeCharged {
        payload_hash: Hash,
        fee: u64,
        user_signature: Vec<u8>,
    },
    UnstakeRequest {
        from: Address,
        script_pubkey: Vec<u8>,
        amount_after_fee: u64,
    },
    WithdrawalsEnabled { enabled: bool },
    BasculeChanged { attached: bool },
    BurnCommissionChanged { old: u64, new: u64 },
    DustFeeRateChanged { old: u64, new: u64 },
    MaximumFeeChanged { old: u64, new: u64 },
    Paused { account: Address },
    Unpaused { account: Address },
}
