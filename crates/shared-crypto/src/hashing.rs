//! # Hashing
//!
//! - SHA-256 for payload hashes (the signed message and the anti-replay key)
//! - Keccak-256 for selectors, address derivation and deposit identifiers

use sha2::Sha256;
use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Four-byte selector: the first bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// EIP-191 digest of a 32-byte message:
/// `keccak256("\x19Ethereum Signed Message:\n32" || message)`.
pub fn eth_signed_message_hash(message: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n32");
    hasher.update(message);
    hasher.finalize().into()
}
