//! Error types for the consortium.

use qc_01_action_codec::CodecError;
use shared_types::AccessError;
use thiserror::Error;

/// Consortium errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsortiumError {
    /// No validator set has been installed yet
    #[error("Consortium not initialized")]
    NotInitialized,

    /// Bootstrap was attempted twice
    #[error("Validator set already initialized at epoch {epoch}")]
    AlreadyInitialized { epoch: u64 },

    /// Proof bytes are malformed or carry an invalid signature
    #[error("Bad proof: {reason}")]
    BadProof { reason: String },

    /// Valid signatures do not reach the quorum threshold
    #[error("Not enough signatures: signed weight {signed}, required {required}")]
    NotEnoughSignatures { signed: u64, required: u64 },

    /// Proof slot count differs from the validator count
    #[error("Signature count mismatch: {expected} validators, {actual} proof slots")]
    SignatureCountMismatch { expected: usize, actual: usize },

    /// Rotation epoch is not current + 1
    #[error("Invalid epoch: expected {expected}, got {actual}")]
    InvalidEpoch { expected: u64, actual: u64 },

    /// Current epoch is the last representable one
    #[error("Epoch {current} cannot advance")]
    EpochExhausted { current: u64 },

    /// Rotation height does not advance
    #[error("Invalid height: current {current}, proposed {proposed}")]
    InvalidHeight { current: u64, proposed: u64 },

    /// Empty set or more validators than allowed
    #[error("Invalid validator set size {size} (max {max})")]
    InvalidValidatorSetSize { size: usize, max: usize },

    /// Same key listed twice
    #[error("Duplicate validator at index {index}")]
    DuplicateValidator { index: usize },

    /// Validator with zero weight
    #[error("Zero weight at index {index}")]
    ZeroWeight { index: usize },

    /// Key is not an uncompressed secp256k1 point
    #[error("Invalid validator key at index {index}")]
    InvalidValidatorKey { index: usize },

    /// Quorum fraction outside (0, 1]
    #[error("Invalid quorum {numerator}/{denominator}")]
    InvalidQuorum { numerator: u64, denominator: u64 },

    /// Total weight does not fit in 64 bits
    #[error("Total validator weight overflows")]
    WeightOverflow,

    /// Payload failed to decode
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Caller lacks the owner role
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Result type for consortium operations
pub type ConsortiumResult<T> = Result<T, ConsortiumError>;
