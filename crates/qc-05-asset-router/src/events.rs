//! Outgoing router events.

use serde::Serialize;
use shared_types::{Address, ChainId, Hash, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RouterEvent {
    RouteSet {
        from_token: TokenId,
        from_chain: ChainId,
        to_token: TokenId,
        to_chain: ChainId,
    },
    RouteRemoved {
        from_token: TokenId,
        to_chain: ChainId,
    },
    NamedTokenSet {
        name: String,
        token: TokenId,
    },
    /// Origin side: the encoded request is handed to the notaries.
    StakingOperationRequested {
        nonce: u64,
        payload_hash: Hash,
        payload: Vec<u8>,
    },
    /// Destination side: the notarized receipt was honoured.
    StakingOperationFinalized {
        request_hash: Hash,
        recipient: Address,
        token: TokenId,
        amount: u64,
    },
    NativeRedeemRequested {
        payload_hash: Hash,
        payload: Vec<u8>,
        amount_after_fee: u64,
    },
    CommissionUpdated {
        old: u64,
        new: u64,
    },
    DustFeeRateUpdated {
        old: u64,
        new: u64,
    },
}
