//! Selector table.

use std::fmt;

/// Discriminant of every authorizable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DepositV0,
    DepositV1,
    NewValidatorSet,
    FeeApproval,
    StakingRequest,
    StakingReceipt,
    RedeemFromNativeToken,
}

impl ActionKind {
    /// Every kind, in selector-table order.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::DepositV0,
        ActionKind::DepositV1,
        ActionKind::NewValidatorSet,
        ActionKind::FeeApproval,
        ActionKind::StakingRequest,
        ActionKind::StakingReceipt,
        ActionKind::RedeemFromNativeToken,
    ];

    /// `keccak256(signature)[..4]`.
    pub const fn selector(self) -> [u8; 4] {
        match self {
            ActionKind::DepositV0 => [0xcc, 0xf8, 0xa6, 0x61],
            ActionKind::DepositV1 => [0xea, 0x87, 0x1f, 0xf9],
            ActionKind::NewValidatorSet => [0x33, 0xc0, 0x6b, 0xb5],
            ActionKind::FeeApproval => [0x81, 0x75, 0xca, 0x94],
            ActionKind::StakingRequest => [0xb0, 0x50, 0x09, 0x72],
            ActionKind::StakingReceipt => [0xbe, 0x61, 0xdf, 0x39],
            ActionKind::RedeemFromNativeToken => [0x89, 0x13, 0xde, 0xa1],
        }
    }

    /// Canonical signature string the selector is derived from.
    pub const fn signature(self) -> &'static str {
        match self {
            ActionKind::DepositV0 => "depositV0(bytes32,bytes32,uint64,bytes32,uint32)",
            ActionKind::DepositV1 => "depositV1(bytes32,bytes32,uint64,bytes32,uint32,bytes32)",
            ActionKind::NewValidatorSet => {
                "newValidatorSet(uint256,bytes[],uint256[],uint256,uint256,uint256)"
            }
            ActionKind::FeeApproval => "feeApproval(uint256,uint256)",
            ActionKind::StakingRequest => {
                "stakingRequest(uint256,bytes32,uint256,bytes32,bytes32,bytes32,bytes32)"
            }
            ActionKind::StakingReceipt => {
                "stakingReceipt(bytes32,bytes32,uint256,bytes32,bytes32,bytes32)"
            }
            ActionKind::RedeemFromNativeToken => "redeemFromNativeToken(bytes32,bytes,uint256)",
        }
    }

    /// Exact encoded length including the selector, for fixed-size actions.
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            ActionKind::DepositV0 => Some(4 + 5 * 32),
            ActionKind::DepositV1 => Some(4 + 6 * 32),
            ActionKind::FeeApproval => Some(4 + 2 * 32),
            ActionKind::StakingRequest => Some(4 + 7 * 32),
            ActionKind::StakingReceipt => Some(4 + 6 * 32),
            ActionKind::NewValidatorSet | ActionKind::RedeemFromNativeToken => None,
        }
    }

    /// Reverse lookup.
    pub fn from_selector(selector: [u8; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::DepositV0 => "DepositV0",
            ActionKind::DepositV1 => "DepositV1",
            ActionKind::NewValidatorSet => "NewValidatorSet",
            ActionKind::FeeApproval => "FeeApproval",
            ActionKind::StakingRequest => "StakingOperationRequest",
            ActionKind::StakingReceipt => "StakingReceipt",
            ActionKind::RedeemFromNativeToken => "RedeemFromNativeToken",
        };
        f.write_str(name)
    }
}
