//! # Fee Approvals
//!
//! A recipient authorises a claimer to deduct up to `fee` from their
//! deposit by signing `sha256(FeeApproval payload)`. Approvals are not
//! consumed; they stay usable until the deadline.

use super::errors::{MinterError, MinterResult};
use qc_01_action_codec::{decode, payload_hash, FeeApproval};
use shared_crypto::{signer_matches, EcdsaSignature};
use shared_types::Address;

/// Decode `fee_payload` and check it was signed by `recipient`.
pub fn verify_fee_approval(
    fee_payload: &[u8],
    user_signature: &[u8],
    recipient: &Address,
) -> MinterResult<FeeApproval> {
    let approval: FeeApproval = decode(fee_payload)?;
    let signature =
        EcdsaSignature::from_slice(user_signature).map_err(|_| MinterError::InvalidUserSignature)?;
    let hash = payload_hash(fee_payload);
    match signer_matches(&hash, &signature, recipient) {
        Ok(true) => Ok(approval),
        Ok(false) | Err(_) => Err(MinterError::InvalidUserSignature),
    }
}

/// Fee actually charged: `min(approved, maximum_fee)`, strictly below `amount`.
pub fn charged_fee(approval: &FeeApproval, maximum_fee: u64, amount: u64, now: u64) -> MinterResult<u64> {
    if now > approval.deadline {
        return Err(MinterError::UserSignatureExpired {
            deadline: approval.deadline,
            now,
        });
    }
    let fee = approval.fee.min(maximum_fee);
    if fee >= amount {
        return Err(MinterError::FeeGreaterThanAmount { fee, amount });
    }
    Ok(fee)
}
