//! # Recoverable ECDSA (secp256k1)
//!
//! Signature parsing, signer recovery and key handling for notary proofs,
//! trusted-signer deposit reports and user fee approvals.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN the half order
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: range checks use `subtle`
//! - Messages are 32-byte prehashes; nothing here hashes the message again
//!
//! A 64-byte signature carries no recovery id. Both ids are tried and the
//! signature matches if either recovers the expected signer.

use crate::errors::SignatureError;
use crate::hashing::keccak256;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Address, Hash};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Length of an `r || s` signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;
/// Length of an `r || s || v` signature.
pub const RECOVERABLE_SIGNATURE_LEN: usize = 65;
/// Length of an uncompressed SEC1 public key (`0x04 || x || y`).
pub const UNCOMPRESSED_KEY_LEN: usize = 65;

// =============================================================================
// SIGNATURE
// =============================================================================

/// ECDSA signature components. `v` is `None` for 64-byte signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component
    pub r: [u8; 32],
    /// S component
    pub s: [u8; 32],
    /// Recovery byte (0, 1, 27 or 28)
    pub v: Option<u8>,
}

impl EcdsaSignature {
    /// Parse a 64-byte (`r || s`) or 65-byte (`r || s || v`) signature and
    /// validate its components.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let v = match bytes.len() {
            COMPACT_SIGNATURE_LEN => None,
            RECOVERABLE_SIGNATURE_LEN => Some(bytes[64]),
            other => return Err(SignatureError::InvalidLength(other)),
        };
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        let signature = Self { r, s, v };
        signature.validate()?;
        Ok(signature)
    }

    /// Serialize to 64 or 65 bytes depending on whether `v` is present.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECOVERABLE_SIGNATURE_LEN);
        out.extend_from_slice(&self.r);
        out.extend_from_slice(&self.s);
        if let Some(v) = self.v {
            out.push(v);
        }
        out
    }

    /// Drop the recovery byte.
    pub fn compact(&self) -> Self {
        Self { v: None, ..*self }
    }

    /// Range, low-S and recovery byte checks.
    pub fn validate(&self) -> Result<(), SignatureError> {
        if !is_valid_scalar(&self.r) || !is_valid_scalar(&self.s) {
            return Err(SignatureError::ScalarOutOfRange);
        }
        if !is_low_s(&self.s) {
            return Err(SignatureError::MalleableSignature);
        }
        if let Some(v) = self.v {
            parse_recovery_id(v)?;
        }
        Ok(())
    }

    fn to_k256(self) -> Result<Signature, SignatureError> {
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&self.r);
        sig_bytes[32..].copy_from_slice(&self.s);
        let parsed = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat);
        sig_bytes.zeroize();
        parsed
    }
}

// =============================================================================
// PUBLIC KEY
// =============================================================================

/// Uncompressed secp256k1 public key, validated to lie on the curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcdsaPublicKey([u8; UNCOMPRESSED_KEY_LEN]);

impl EcdsaPublicKey {
    /// Parse a 65-byte `0x04`-prefixed key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != UNCOMPRESSED_KEY_LEN || bytes[0] != 0x04 {
            return Err(SignatureError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(bytes).map_err(|_| SignatureError::InvalidPublicKey)?;
        let mut key = [0u8; UNCOMPRESSED_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; UNCOMPRESSED_KEY_LEN] {
        &self.0
    }

    /// Keccak-derived 20-byte address.
    pub fn address(&self) -> Address {
        address_from_uncompressed(&self.0)
    }
}

impl fmt::Debug for EcdsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaPublicKey(0x{})", hex::encode(&self.0[1..9]))
    }
}

impl From<&VerifyingKey> for EcdsaPublicKey {
    fn from(key: &VerifyingKey) -> Self {
        let encoded = key.to_encoded_point(false);
        let mut bytes = [0u8; UNCOMPRESSED_KEY_LEN];
        bytes.copy_from_slice(encoded.as_bytes());
        Self(bytes)
    }
}

// =============================================================================
// RECOVERY
// =============================================================================

/// Recover the signer address of a 65-byte signature.
pub fn recover_address(message_hash: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    signature.validate()?;
    let v = signature.v.ok_or(SignatureError::InvalidFormat)?;
    let recovery_id = parse_recovery_id(v)?;
    recover_with_id(message_hash, &signature.to_k256()?, recovery_id)
}

/// Addresses the signature could have come from: one for 65-byte
/// signatures, up to two for 64-byte ones.
pub fn recovery_candidates(
    message_hash: &Hash,
    signature: &EcdsaSignature,
) -> Result<Vec<Address>, SignatureError> {
    signature.validate()?;
    let sig = signature.to_k256()?;

    if let Some(v) = signature.v {
        return Ok(vec![recover_with_id(message_hash, &sig, parse_recovery_id(v)?)?]);
    }

    let candidates: Vec<Address> = [0u8, 1u8]
        .iter()
        .filter_map(|&id| RecoveryId::from_byte(id))
        .filter_map(|id| recover_with_id(message_hash, &sig, id).ok())
        .collect();

    if candidates.is_empty() {
        return Err(SignatureError::RecoveryFailed);
    }
    Ok(candidates)
}

/// Whether a well-formed signature was produced by `expected`.
///
/// Malformed signatures are errors; a valid signature from someone else is
/// `Ok(false)`.
pub fn signer_matches(
    message_hash: &Hash,
    signature: &EcdsaSignature,
    expected: &Address,
) -> Result<bool, SignatureError> {
    let candidates = recovery_candidates(message_hash, signature)?;
    Ok(candidates.iter().any(|c| c == expected))
}

/// Like [`signer_matches`] but reports a mismatch as [`SignatureError::SignerMismatch`].
pub fn verify_signer(
    message_hash: &Hash,
    signature: &EcdsaSignature,
    expected: &Address,
) -> Result<(), SignatureError> {
    let candidates = recovery_candidates(message_hash, signature)?;
    if candidates.iter().any(|c| c == expected) {
        return Ok(());
    }
    Err(SignatureError::SignerMismatch {
        expected: *expected,
        actual: candidates[0],
    })
}

fn recover_with_id(
    message_hash: &Hash,
    signature: &Signature,
    recovery_id: RecoveryId,
) -> Result<Address, SignatureError> {
    let recovered = VerifyingKey::recover_from_prehash(message_hash, signature, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(address_from_pubkey(&recovered))
}

/// Derive the address of a verifying key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let mut bytes = [0u8; UNCOMPRESSED_KEY_LEN];
    bytes.copy_from_slice(encoded.as_bytes());
    address_from_uncompressed(&bytes)
}

fn address_from_uncompressed(key: &[u8; UNCOMPRESSED_KEY_LEN]) -> Address {
    // Skip 0x04 prefix, take last 20 bytes
    let hash = keccak256(&key[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

// =============================================================================
// SCALAR CHECKS
// =============================================================================

/// Constant-time `s < n/2` (strict, per EIP-2).
fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Constant-time check that a scalar is in [1, n-1].
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }
    (!is_zero & ct_less_than(scalar, &SECP256K1_ORDER)).into()
}

fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        less |= not_decided & Choice::from((a[i] < b[i]) as u8);
        greater |= not_decided & Choice::from((a[i] > b[i]) as u8);
    }
    less
}

/// Parse recovery ID from v value. Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::from_byte(id).ok_or(SignatureError::InvalidRecoveryId(v))
}

/// `s' = n - s`, used to flip a signature into its malleable twin.
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// KEY PAIR
// =============================================================================

/// secp256k1 signing key used by notaries, the trusted signer and depositors.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Create from secret key bytes. The input copy is wiped.
    pub fn from_bytes(mut bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let parsed = SigningKey::from_slice(&bytes).map_err(|_| SignatureError::InvalidPrivateKey);
        bytes.zeroize();
        Ok(Self {
            signing_key: parsed?,
        })
    }

    /// Uncompressed public key.
    pub fn public_key(&self) -> EcdsaPublicKey {
        EcdsaPublicKey::from(self.signing_key.verifying_key())
    }

    /// Address of the public key.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash. The result is low-S with `v` in {27, 28}.
    pub fn sign_prehash(&self, message_hash: &Hash) -> Result<EcdsaSignature, SignatureError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(message_hash)
            .map_err(|_| SignatureError::InvalidFormat)?;

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        // Normalize S to low value (EIP-2), flipping the recovery id with it
        let (s, parity) = if is_low_s(&s) {
            (s, recid.to_byte() & 1)
        } else {
            (invert_s(&s), (recid.to_byte() & 1) ^ 1)
        };

        Ok(EcdsaSignature {
            r,
            s,
            v: Some(27 + parity),
        })
    }
}

impl fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1KeyPair(0x{})", hex::encode(self.address()))
    }
}
