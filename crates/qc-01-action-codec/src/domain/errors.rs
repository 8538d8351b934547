//! # Schema Errors
//!
//! Always fatal; a payload that fails here is never partially applied.

use super::kind::ActionKind;
use thiserror::Error;

/// Decoding failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The leading four bytes match no known action.
    #[error("Unknown action selector 0x{}", hex::encode(.0))]
    UnknownSelector([u8; 4]),

    /// A known action arrived where a different one was expected.
    #[error("Invalid action: expected {expected}, got {actual}")]
    InvalidAction {
        expected: ActionKind,
        actual: ActionKind,
    },

    /// Payload length differs from what the selector dictates.
    #[error("Invalid payload size: expected {expected} bytes, got {actual}")]
    InvalidPayloadSize { expected: usize, actual: usize },

    /// Validator key and weight arrays differ in length.
    #[error("Non-equal length: {keys} keys, {weights} weights")]
    NonEqualLength { keys: usize, weights: usize },

    /// A word carries non-zero padding or exceeds the field's width.
    #[error("Field out of range: {field}")]
    FieldOutOfRange { field: &'static str },
}
