//! # Consortium (QC-02)
//!
//! Weighted notary quorum shared by every consuming module.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): validator sets, proof codec, quorum rule
//! - **Ports Layer** (`ports/`): [`PayloadVerifier`], the gate consumers call
//! - **Service Layer** (`service.rs`): current set, history, rotation
//!
//! ## Rules
//!
//! - Threshold is `ceil(totalWeight × num / den)`
//! - Proof slots align positionally with the validator order
//! - Rotation is signed by the outgoing set and moves the epoch by exactly one

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export public API
pub use domain::errors::{ConsortiumError, ConsortiumResult};
pub use domain::proof::{ProofSlot, SignatureProof};
pub use domain::quorum::{check_quorum, signed_weight};
pub use domain::validator_set::{quorum_threshold, Validator, ValidatorSet};
pub use events::ConsortiumEvent;
pub use ports::inbound::{PayloadVerifier, VerifiedPayload};
pub use service::{Consortium, ConsortiumConfig};
