//! Notarized deposits, normalised across the V0 and V1 layouts.

use super::errors::{MinterError, MinterResult};
use qc_01_action_codec::{Action, ActionKind, CodecError};
use shared_types::{Address, ChainId, Hash, TokenId, ZERO_ADDRESS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotarizedDeposit {
    pub kind: ActionKind,
    pub to_chain: ChainId,
    pub recipient: Address,
    pub amount: u64,
    /// Explicit only for V1; V0 always means the minter's own token.
    pub token: Option<TokenId>,
    pub txid: Hash,
    pub vout: u32,
}

impl NotarizedDeposit {
    /// Accept exactly `expected`; any other action is a schema error.
    pub fn from_action(action: Action, expected: ActionKind) -> MinterResult<Self> {
        let deposit = match action {
            Action::DepositV0(d) if expected == ActionKind::DepositV0 => Self {
                kind: ActionKind::DepositV0,
                to_chain: d.to_chain,
                recipient: d.recipient,
                amount: d.amount,
                token: None,
                txid: d.txid,
                vout: d.vout,
            },
            Action::DepositV1(d) if expected == ActionKind::DepositV1 => Self {
                kind: ActionKind::DepositV1,
                to_chain: d.to_chain,
                recipient: d.recipient,
                amount: d.amount,
                token: Some(d.token),
                txid: d.txid,
                vout: d.vout,
            },
            other => {
                return Err(CodecError::InvalidAction {
                    expected,
                    actual: other.kind(),
                }
                .into())
            }
        };
        Ok(deposit)
    }

    /// Semantic checks against the minter's chain and token.
    pub fn check(&self, chain_id: &ChainId, token: &TokenId) -> MinterResult<()> {
        if self.to_chain != *chain_id {
            return Err(MinterError::WrongChain {
                expected: *chain_id,
                actual: self.to_chain,
            });
        }
        if let Some(named) = self.token {
            if named != *token {
                return Err(MinterError::WrongToken {
                    expected: *token,
                    actual: named,
                });
            }
        }
        if self.amount == 0 {
            return Err(MinterError::ZeroAmount);
        }
        if self.recipient == ZERO_ADDRESS {
            return Err(MinterError::ZeroRecipient);
        }
        Ok(())
    }
}
