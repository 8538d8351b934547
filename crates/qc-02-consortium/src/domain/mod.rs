//! # Domain Layer
//!
//! Validator sets, the proof codec and the weighted quorum rule.

pub mod errors;
pub mod proof;
pub mod quorum;
pub mod validator_set;
