//! # Mailbox Envelopes
//!
//! One JSON object per line, hex fields with optional `0x`:
//!
//! ```text
//! {"payload": "0x...", "proof": "0x..."}
//! {"payloads": ["0x...", ...], "proofs": ["0x...", ...]}
//! {"report_id": "0x...", "deposit_ids": ["0x...", ...], "proofs": ["0x...", ...]}
//! ```

use serde::Deserialize;
use shared_types::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex in {field}: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{field} must be 32 bytes, got {actual}")]
    InvalidLength { field: &'static str, actual: usize },
}

/// A decoded mailbox message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Envelope {
    Single { payload: Vec<u8>, proof: Vec<u8> },
    Batch { payloads: Vec<Vec<u8>>, proofs: Vec<Vec<u8>> },
    /// Bascule deposit report, submitted by the runtime's reporter account.
    Report {
        report_id: Hash,
        deposit_ids: Vec<Hash>,
        proofs: Vec<Vec<u8>>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnvelope {
    Single { payload: String, proof: String },
    Batch { payloads: Vec<String>, proofs: Vec<String> },
    Report {
        report_id: String,
        deposit_ids: Vec<String>,
        proofs: Vec<String>,
    },
}

impl Envelope {
    /// Parse one NDJSON line.
    pub fn parse(line: &str) -> Result<Self, MailboxError> {
        match serde_json::from_str(line)? {
            RawEnvelope::Single { payload, proof } => Ok(Envelope::Single {
                payload: decode_hex("payload", &payload)?,
                proof: decode_hex("proof", &proof)?,
            }),
            RawEnvelope::Batch { payloads, proofs } => Ok(Envelope::Batch {
                payloads: decode_all("payloads", &payloads)?,
                proofs: decode_all("proofs", &proofs)?,
            }),
            RawEnvelope::Report {
                report_id,
                deposit_ids,
                proofs,
            } => Ok(Envelope::Report {
                report_id: decode_hash("report_id", &report_id)?,
                deposit_ids: deposit_ids
                    .iter()
                    .map(|id| decode_hash("deposit_ids", id))
                    .collect::<Result<_, _>>()?,
                proofs: decode_all("proofs", &proofs)?,
            }),
        }
    }
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, MailboxError> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(trimmed).map_err(|source| MailboxError::Hex { field, source })
}

fn decode_hash(field: &'static str, value: &str) -> Result<Hash, MailboxError> {
    let bytes = decode_hex(field, value)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| MailboxError::InvalidLength {
            field,
            actual: b.len(),
        })
}

fn decode_all(field: &'static str, values: &[String]) -> Result<Vec<Vec<u8>>, MailboxError> {
    values.iter().map(|v| decode_hex(field, v)).collect()
}
