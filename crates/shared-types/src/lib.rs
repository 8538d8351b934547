//! # Shared Types Crate
//!
//! Types shared by every custody subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers (`ChainId`, `TokenId`, `Address`)
//!   are defined once and used by the codec, the gates and the consumers.
//! - **Capabilities, not bitmasks**: every privileged entry point checks a
//!   distinct [`Role`] through [`AccessControl`]; self-revoking privileges are
//!   modelled as move-once [`OneShotCapability`] values.
//! - **Ports at the edge**: token bookkeeping is an external collaborator
//!   reached through [`TokenLedger`].

pub mod entities;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use events::EventLog;
pub use ledger::{InMemoryTokenLedger, TokenLedger};
pub use security::*;
