//! Signature error types.

use thiserror::Error;

/// Errors that can occur while parsing or recovering secp256k1 signatures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature format is invalid (wrong length, invalid encoding)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Wrong number of signature bytes
    #[error("Invalid signature length: expected 64 or 65, got {0}")]
    InvalidLength(usize),

    /// R or S outside [1, n-1]
    #[error("Signature scalar out of range")]
    ScalarOutOfRange,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match expected signer
    #[error("Signer mismatch: expected {expected:?}, got {actual:?}")]
    SignerMismatch {
        /// Address the caller expected
        expected: [u8; 20],
        /// Address actually recovered
        actual: [u8; 20],
    },

    /// Public key bytes are not an uncompressed secp256k1 point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Secret key bytes are not a valid scalar
    #[error("Invalid private key")]
    InvalidPrivateKey,
}
