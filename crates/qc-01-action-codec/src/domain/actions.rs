//! # Action Bodies
//!
//! One struct per authorizable action. Each knows its selector and how to
//! write and read its fields in canonical order.

use super::errors::CodecError;
use super::kind::ActionKind;
use super::words::{WordReader, WordWriter, WORD};
use shared_types::{Address, ChainId, Hash, TokenId};

/// Uncompressed secp256k1 key length inside a validator key slot.
pub const VALIDATOR_KEY_LEN: usize = 65;
/// Key slot length (key plus zero padding to a word boundary).
pub const VALIDATOR_KEY_SLOT: usize = 3 * WORD;

/// Typed body of a single action kind.
pub trait ActionBody: Sized {
    /// The kind this body encodes.
    const KIND: ActionKind;

    /// Write fields after the selector.
    fn write_fields(&self, writer: &mut WordWriter);

    /// Read fields after the selector. Must consume exactly what it needs.
    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError>;
}

/// Legacy deposit notarization; the minted token is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositV0 {
    pub to_chain: ChainId,
    pub recipient: Address,
    pub amount: u64,
    pub txid: Hash,
    pub vout: u32,
}

impl ActionBody for DepositV0 {
    const KIND: ActionKind = ActionKind::DepositV0;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer
            .word(self.to_chain.as_bytes())
            .address(&self.recipient)
            .u64(self.amount)
            .word(&self.txid)
            .u32(self.vout);
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            to_chain: ChainId(reader.word()?),
            recipient: reader.address("recipient")?,
            amount: reader.u64("amount")?,
            txid: reader.word()?,
            vout: reader.u32("vout")?,
        })
    }
}

/// Deposit notarization naming the destination token explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositV1 {
    pub to_chain: ChainId,
    pub recipient: Address,
    pub amount: u64,
    pub txid: Hash,
    pub vout: u32,
    pub token: TokenId,
}

impl ActionBody for DepositV1 {
    const KIND: ActionKind = ActionKind::DepositV1;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer
            .word(self.to_chain.as_bytes())
            .address(&self.recipient)
            .u64(self.amount)
            .word(&self.txid)
            .u32(self.vout)
            .word(self.token.as_bytes());
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            to_chain: ChainId(reader.word()?),
            recipient: reader.address("recipient")?,
            amount: reader.u64("amount")?,
            txid: reader.word()?,
            vout: reader.u32("vout")?,
            token: TokenId(reader.word()?),
        })
    }
}

/// One entry of a proposed validator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorEntry {
    /// `0x04 || x || y`. Curve membership is checked by the consortium.
    pub public_key: [u8; VALIDATOR_KEY_LEN],
    pub weight: u64,
}

/// Validator-set rotation (or bootstrap) message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewValidatorSet {
    pub epoch: u64,
    pub validators: Vec<ValidatorEntry>,
    pub quorum_numerator: u64,
    pub quorum_denominator: u64,
    pub height: u64,
}

impl ActionBody for NewValidatorSet {
    const KIND: ActionKind = ActionKind::NewValidatorSet;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer.u64(self.epoch).u64(self.validators.len() as u64);
        for entry in &self.validators {
            writer
                .raw(&entry.public_key)
                .raw(&[0u8; VALIDATOR_KEY_SLOT - VALIDATOR_KEY_LEN]);
        }
        writer.u64(self.validators.len() as u64);
        for entry in &self.validators {
            writer.u64(entry.weight);
        }
        writer
            .u64(self.quorum_numerator)
            .u64(self.quorum_denominator)
            .u64(self.height);
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        let epoch = reader.u64("epoch")?;
        let key_count = slot_count(reader, "validator_count", VALIDATOR_KEY_SLOT)?;

        let mut keys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            let slot = reader.raw(VALIDATOR_KEY_SLOT)?;
            if slot[VALIDATOR_KEY_LEN..].iter().any(|b| *b != 0) {
                return Err(CodecError::FieldOutOfRange {
                    field: "validator_key",
                });
            }
            let mut key = [0u8; VALIDATOR_KEY_LEN];
            key.copy_from_slice(&slot[..VALIDATOR_KEY_LEN]);
            keys.push(key);
        }

        let weight_count = slot_count(reader, "weight_count", WORD)?;
        if weight_count != key_count {
            return Err(CodecError::NonEqualLength {
                keys: key_count,
                weights: weight_count,
            });
        }

        let mut validators = Vec::with_capacity(key_count);
        for public_key in keys {
            validators.push(ValidatorEntry {
                public_key,
                weight: reader.u64("weight")?,
            });
        }

        Ok(Self {
            epoch,
            validators,
            quorum_numerator: reader.u64("quorum_numerator")?,
            quorum_denominator: reader.u64("quorum_denominator")?,
            height: reader.u64("height")?,
        })
    }
}

/// Read an element count, bounded by what the payload could possibly hold.
fn slot_count(
    reader: &mut WordReader<'_>,
    field: &'static str,
    slot: usize,
) -> Result<usize, CodecError> {
    let count = reader.u64(field)?;
    let count = usize::try_from(count).map_err(|_| CodecError::FieldOutOfRange { field })?;
    if count > reader.remaining() / slot {
        return Err(CodecError::InvalidPayloadSize {
            expected: count.saturating_mul(slot),
            actual: reader.remaining(),
        });
    }
    Ok(count)
}

/// User-signed approval of a claimer fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeApproval {
    pub fee: u64,
    /// Unix seconds; the approval is usable up to and including this instant.
    pub deadline: u64,
}

impl ActionBody for FeeApproval {
    const KIND: ActionKind = ActionKind::FeeApproval;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer.u64(self.fee).u64(self.deadline);
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            fee: reader.u64("fee")?,
            deadline: reader.u64("deadline")?,
        })
    }
}

/// Origin-chain record of a cross-chain staking swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingOperationRequest {
    pub nonce: u64,
    pub recipient: Address,
    pub amount: u64,
    pub from_token: TokenId,
    pub to_token: TokenId,
    pub from_chain: ChainId,
    pub to_chain: ChainId,
}

impl ActionBody for StakingOperationRequest {
    const KIND: ActionKind = ActionKind::StakingRequest;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer
            .u64(self.nonce)
            .address(&self.recipient)
            .u64(self.amount)
            .word(self.from_token.as_bytes())
            .word(self.to_token.as_bytes())
            .word(self.from_chain.as_bytes())
            .word(self.to_chain.as_bytes());
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            nonce: reader.u64("nonce")?,
            recipient: reader.address("recipient")?,
            amount: reader.u64("amount")?,
            from_token: TokenId(reader.word()?),
            to_token: TokenId(reader.word()?),
            from_chain: ChainId(reader.word()?),
            to_chain: ChainId(reader.word()?),
        })
    }
}

/// Destination-chain receipt referencing a staking request by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingReceipt {
    pub request_hash: Hash,
    pub recipient: Address,
    pub amount: u64,
    pub from_token: TokenId,
    pub to_token: TokenId,
    pub chain: ChainId,
}

impl ActionBody for StakingReceipt {
    const KIND: ActionKind = ActionKind::StakingReceipt;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer
            .word(&self.request_hash)
            .address(&self.recipient)
            .u64(self.amount)
            .word(self.from_token.as_bytes())
            .word(self.to_token.as_bytes())
            .word(self.chain.as_bytes());
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            request_hash: reader.word()?,
            recipient: reader.address("recipient")?,
            amount: reader.u64("amount")?,
            from_token: TokenId(reader.word()?),
            to_token: TokenId(reader.word()?),
            chain: ChainId(reader.word()?),
        })
    }
}

/// Request to release bitcoin against burned native tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemFromNativeToken {
    pub recipient: Address,
    pub script_pubkey: Vec<u8>,
    pub amount: u64,
}

impl ActionBody for RedeemFromNativeToken {
    const KIND: ActionKind = ActionKind::RedeemFromNativeToken;

    fn write_fields(&self, writer: &mut WordWriter) {
        writer
            .address(&self.recipient)
            .bytes(&self.script_pubkey)
            .u64(self.amount);
    }

    fn read_fields(reader: &mut WordReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            recipient: reader.address("recipient")?,
            script_pubkey: reader.bytes("script_pubkey")?,
            amount: reader.u64("amount")?,
        })
    }
}
