//! # Core Domain Entities
//!
//! Identifiers used across the custody core.
//!
//! ## Clusters
//!
//! - **Hashing**: `Hash`
//! - **Accounts**: `Address`, 32-byte words
//! - **Cross-chain identity**: `ChainId`, `TokenId`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash (SHA-256 payload hash or Keccak-256 digest).
pub type Hash = [u8; 32];

/// A 32-byte ABI word.
pub type Word = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// The zero address. Used as an explicit "disabled" sentinel by configuration
/// knobs such as the Bascule trusted signer.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Left-pad an address into a 32-byte word.
pub fn address_to_word(address: &Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

/// Extract an address from a word. Returns `None` if the 12 pad bytes are not zero.
pub fn word_to_address(word: &Word) -> Option<Address> {
    if word[..12].iter().any(|&b| b != 0) {
        return None;
    }
    let mut address = [0u8; 20];
    address.copy_from_slice(&word[12..]);
    Some(address)
}

// =============================================================================
// CHAIN IDENTIFIERS
// =============================================================================

/// Ledger identifier (32 bytes).
///
/// EVM chains carry their numeric chain id in the low-order bytes. Bitcoin
/// networks use the `0xff` prefix so they never collide with an EVM id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub [u8; 32]);

impl ChainId {
    /// Bitcoin mainnet.
    pub const BITCOIN_MAINNET: ChainId = ChainId::bitcoin(0);
    /// Bitcoin signet.
    pub const BITCOIN_SIGNET: ChainId = ChainId::bitcoin(1);

    /// EVM chain by numeric id.
    pub const fn evm(id: u64) -> Self {
        let mut bytes = [0u8; 32];
        let be = id.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Bitcoin network by index.
    pub const fn bitcoin(network: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xff;
        bytes[31] = network;
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this identifier names a Bitcoin network.
    pub fn is_bitcoin(&self) -> bool {
        self.0[0] == 0xff
    }
}

impl From<[u8; 32]> for ChainId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// =============================================================================
// TOKEN IDENTIFIERS
// =============================================================================

/// Token identifier (32 bytes). EVM tokens are their contract address left-padded.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    /// Token identified by an EVM contract address.
    pub fn from_address(address: Address) -> Self {
        Self(address_to_word(&address))
    }

    /// The EVM address, if this id is a padded address.
    pub fn as_address(&self) -> Option<Address> {
        word_to_address(&self.0)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<[u8; 32]> for TokenId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
