//! # Action Codec (QC-01)
//!
//! Binary schema for every authorizable message.
//!
//! ## Layout
//!
//! ```text
//! selector (4 bytes) || field word (32 bytes) || field word || ...
//! ```
//!
//! The selector is `keccak256(signature)[..4]` and alone determines the body
//! layout and length. Deposit V0 and V1 are distinct kinds; neither decodes
//! as the other.
//!
//! ## Usage
//!
//! ```
//! use qc_01_action_codec::{decode, encode, FeeApproval};
//!
//! let payload = encode(&FeeApproval { fee: 10, deadline: 1_700_000_000 });
//! let approval: FeeApproval = decode(&payload).unwrap();
//! assert_eq!(approval.fee, 10);
//! ```

pub mod codec;
pub mod domain;

// Re-export public API
pub use codec::{decode, deposit_id, encode, payload_hash, peek_kind, Action};
pub use domain::actions::{
    ActionBody, DepositV0, DepositV1, FeeApproval, NewValidatorSet, RedeemFromNativeToken,
    StakingOperationRequest, StakingReceipt, ValidatorEntry, VALIDATOR_KEY_LEN,
    VALIDATOR_KEY_SLOT,
};
pub use domain::errors::CodecError;
pub use domain::kind::ActionKind;
