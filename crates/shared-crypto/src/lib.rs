//! # Shared Crypto - Signature and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, Keccak-256 | Payload hashes, selectors, address derivation |
//! | `ecdsa` | secp256k1 | Notary proofs, trusted-signer reports, fee approvals |
//!
//! ## Security Properties
//!
//! - **Malleability Prevention (EIP-2)**: S must be strictly below n/2
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Comparisons**: `subtle` for scalar range checks
//! - **secp256k1**: RFC 6979 deterministic signing, low-S normalization

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{
    address_from_pubkey, invert_s, recover_address, recovery_candidates, signer_matches,
    verify_signer, EcdsaPublicKey, EcdsaSignature, Secp256k1KeyPair,
};
pub use errors::SignatureError;
pub use hashing::{eth_signed_message_hash, keccak256, selector, sha256};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
