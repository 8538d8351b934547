//! # Bitcoin Outputs
//!
//! Destination script classification and the dust rule used to decide
//! whether a redeem is economically spendable.
//!
//! Dust limit (Bitcoin Core, witness outputs):
//!
//! ```text
//! (8 + 1 + len(script) + 67) × dust_fee_rate / 1000
//! ```
//!
//! 8 bytes value, 1 byte script length, 67 bytes for the spending input's
//! witness-discounted size.

use super::errors::RouterError;

/// Default dust relay fee, sat/kvB.
pub const DEFAULT_DUST_FEE_RATE: u64 = 3_000;

const OUTPUT_VALUE_SIZE: u64 = 8;
const SCRIPT_LEN_SIZE: u64 = 1;
const WITNESS_INPUT_SIZE: u64 = 67;

/// Supported destination script types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    /// `OP_0 <20-byte key hash>`
    P2wpkh,
    /// `OP_0 <32-byte script hash>`
    P2wsh,
    /// `OP_1 <32-byte x-only key>`
    P2tr,
    Unsupported,
}

impl OutputType {
    pub fn classify(script: &[u8]) -> Self {
        match script {
            [0x00, 0x14, rest @ ..] if rest.len() == 20 => OutputType::P2wpkh,
            [0x00, 0x20, rest @ ..] if rest.len() == 32 => OutputType::P2wsh,
            [0x51, 0x20, rest @ ..] if rest.len() == 32 => OutputType::P2tr,
            _ => OutputType::Unsupported,
        }
    }
}

/// Minimum spendable output value for `script`.
pub fn dust_limit(script: &[u8], dust_fee_rate: u64) -> Result<u64, RouterError> {
    if OutputType::classify(script) == OutputType::Unsupported {
        return Err(RouterError::ScriptPubkeyUnsupported);
    }
    let size = OUTPUT_VALUE_SIZE + SCRIPT_LEN_SIZE + script.len() as u64 + WITNESS_INPUT_SIZE;
    Ok(size.saturating_mul(dust_fee_rate) / 1000)
}

/// Net redeem amount and whether it clears commission and dust.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakeAmount {
    pub amount_after_fee: u64,
    pub is_above_dust: bool,
    pub is_above_commission: bool,
    pub dust_limit: u64,
}

impl UnstakeAmount {
    /// Net amount, or the reason the redeem must be refused.
    pub fn ensure_redeemable(&self, amount: u64, commission: u64) -> Result<u64, RouterError> {
        if !self.is_above_commission {
            return Err(RouterError::AmountLessThanCommission { amount, commission });
        }
        if !self.is_above_dust {
            return Err(RouterError::AmountBelowDustLimit {
                amount_after_fee: self.amount_after_fee,
                dust_limit: self.dust_limit,
            });
        }
        Ok(self.amount_after_fee)
    }
}

/// `amount <= commission` yields `(0, false)`; otherwise the net amount must
/// be strictly above the dust limit.
pub fn calc_unstake_request_amount(
    script: &[u8],
    amount: u64,
    commission: u64,
    dust_fee_rate: u64,
) -> Result<UnstakeAmount, RouterError> {
    let dust_limit = dust_limit(script, dust_fee_rate)?;
    if amount <= commission {
        return Ok(UnstakeAmount {
            amount_after_fee: 0,
            is_above_dust: false,
            is_above_commission: false,
            dust_limit,
        });
    }
    let amount_after_fee = amount - commission;
    Ok(UnstakeAmount {
        amount_after_fee,
        is_above_dust: amount_after_fee > dust_limit,
        is_above_commission: true,
        dust_limit,
    })
}
