//! Driving port used by the mailbox dispatcher.

use crate::domain::errors::MinterResult;
use crate::service::MintReceipt;
use qc_01_action_codec::ActionKind;

/// Accepts a notarized deposit of either layout.
pub trait DepositSink: Send + Sync {
    fn deposit(&self, kind: ActionKind, payload: &[u8], proof: &[u8]) -> MinterResult<MintReceipt>;
}
