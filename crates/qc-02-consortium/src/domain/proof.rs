//! # Signature Proof
//!
//! ```text
//! count (u32 BE) || { len (u8) || len bytes } × count
//! ```
//!
//! `len = 0` marks an absent signature; 64 and 65 are the only other
//! accepted lengths.

use super::errors::{ConsortiumError, ConsortiumResult};
use shared_crypto::EcdsaSignature;

/// One positional slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofSlot {
    Absent,
    Signed(EcdsaSignature),
}

/// Signatures aligned with the validator order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureProof {
    slots: Vec<ProofSlot>,
}

impl SignatureProof {
    pub fn new(slots: Vec<ProofSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[ProofSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of non-absent slots.
    pub fn signed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, ProofSlot::Signed(_)))
            .count()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.slots.len() * 66);
        out.extend_from_slice(&(self.slots.len() as u32).to_be_bytes());
        for slot in &self.slots {
            match slot {
                ProofSlot::Absent => out.push(0),
                ProofSlot::Signed(sig) => {
                    let bytes = sig.to_vec();
                    out.push(bytes.len() as u8);
                    out.extend_from_slice(&bytes);
                }
            }
        }
        out
    }

    /// Parse and validate every slot. Any defect is `BadProof`.
    pub fn decode(bytes: &[u8]) -> ConsortiumResult<Self> {
        if bytes.len() < 4 {
            return Err(bad("truncated slot count"));
        }
        let count = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let mut rest = &bytes[4..];
        if count > rest.len() {
            return Err(bad("slot count exceeds proof size"));
        }

        let mut slots = Vec::with_capacity(count);
        for index in 0..count {
            let (&len, tail) = rest
                .split_first()
                .ok_or_else(|| bad(format!("slot {index}: missing length")))?;
            let len = len as usize;
            if tail.len() < len {
                return Err(bad(format!("slot {index}: truncated")));
            }
            let (sig_bytes, tail) = tail.split_at(len);
            rest = tail;

            if len == 0 {
                slots.push(ProofSlot::Absent);
                continue;
            }
            let sig = EcdsaSignature::from_slice(sig_bytes)
                .map_err(|e| bad(format!("slot {index}: {e}")))?;
            slots.push(ProofSlot::Signed(sig));
        }

        if !rest.is_empty() {
            return Err(bad(format!("{} trailing bytes", rest.len())));
        }
        Ok(Self { slots })
    }
}

fn bad(reason: impl Into<String>) -> ConsortiumError {
    ConsortiumError::BadProof {
        reason: reason.into(),
    }
}
