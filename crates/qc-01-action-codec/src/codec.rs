//! # Action Codec
//!
//! Encode/decode for the closed set of action payloads.
//!
//! Decoding order is fixed: selector first, then the exact length the
//! selector dictates, then the fields. A payload never decodes under a
//! selector other than its own.

use crate::domain::actions::*;
use crate::domain::errors::CodecError;
use crate::domain::kind::ActionKind;
use crate::domain::words::{WordReader, WordWriter};
use shared_types::Hash;

/// Every authorizable action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DepositV0(DepositV0),
    DepositV1(DepositV1),
    NewValidatorSet(NewValidatorSet),
    FeeApproval(FeeApproval),
    StakingRequest(StakingOperationRequest),
    StakingReceipt(StakingReceipt),
    RedeemFromNativeToken(RedeemFromNativeToken),
}

impl Action {
    /// Discriminant.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::DepositV0(_) => ActionKind::DepositV0,
            Action::DepositV1(_) => ActionKind::DepositV1,
            Action::NewValidatorSet(_) => ActionKind::NewValidatorSet,
            Action::FeeApproval(_) => ActionKind::FeeApproval,
            Action::StakingRequest(_) => ActionKind::StakingRequest,
            Action::StakingReceipt(_) => ActionKind::StakingReceipt,
            Action::RedeemFromNativeToken(_) => ActionKind::RedeemFromNativeToken,
        }
    }

    /// Canonical byte encoding.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Action::DepositV0(body) => encode(body),
            Action::DepositV1(body) => encode(body),
            Action::NewValidatorSet(body) => encode(body),
            Action::FeeApproval(body) => encode(body),
            Action::StakingRequest(body) => encode(body),
            Action::StakingReceipt(body) => encode(body),
            Action::RedeemFromNativeToken(body) => encode(body),
        }
    }

    /// Decode any known action.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let kind = peek_kind(payload)?;
        Ok(match kind {
            ActionKind::DepositV0 => Action::DepositV0(decode_body(payload)?),
            ActionKind::DepositV1 => Action::DepositV1(decode_body(payload)?),
            ActionKind::NewValidatorSet => Action::NewValidatorSet(decode_body(payload)?),
            ActionKind::FeeApproval => Action::FeeApproval(decode_body(payload)?),
            ActionKind::StakingRequest => Action::StakingRequest(decode_body(payload)?),
            ActionKind::StakingReceipt => Action::StakingReceipt(decode_body(payload)?),
            ActionKind::RedeemFromNativeToken => {
                Action::RedeemFromNativeToken(decode_body(payload)?)
            }
        })
    }
}

/// Encode a single body with its selector.
pub fn encode<T: ActionBody>(body: &T) -> Vec<u8> {
    let mut writer = WordWriter::new(T::KIND.selector());
    body.write_fields(&mut writer);
    writer.finish()
}

/// Decode a payload that must be of kind `T`.
///
/// A different known selector fails `InvalidAction`; there is no fallback
/// reinterpretation.
pub fn decode<T: ActionBody>(payload: &[u8]) -> Result<T, CodecError> {
    let actual = peek_kind(payload)?;
    if actual != T::KIND {
        return Err(CodecError::InvalidAction {
            expected: T::KIND,
            actual,
        });
    }
    decode_body(payload)
}

/// Read and resolve the selector.
pub fn peek_kind(payload: &[u8]) -> Result<ActionKind, CodecError> {
    if payload.len() < 4 {
        return Err(CodecError::InvalidPayloadSize {
            expected: 4,
            actual: payload.len(),
        });
    }
    let selector = [payload[0], payload[1], payload[2], payload[3]];
    ActionKind::from_selector(selector).ok_or(CodecError::UnknownSelector(selector))
}

fn decode_body<T: ActionBody>(payload: &[u8]) -> Result<T, CodecError> {
    if let Some(expected) = T::KIND.fixed_len() {
        if payload.len() != expected {
            return Err(CodecError::InvalidPayloadSize {
                expected,
                actual: payload.len(),
            });
        }
    }
    let mut reader = WordReader::new(payload);
    let body = T::read_fields(&mut reader)?;
    reader.finish()?;
    Ok(body)
}

/// Hash that is signed and used as the anti-replay key.
pub fn payload_hash(payload: &[u8]) -> Hash {
    shared_crypto::sha256(payload)
}

/// Deposit identifier shared with the notarization gate: keccak of the body.
pub fn deposit_id(payload: &[u8]) -> Hash {
    shared_crypto::keccak256(payload.get(4..).unwrap_or_default())
}
