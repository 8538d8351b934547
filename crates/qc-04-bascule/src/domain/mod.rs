//! # Domain Layer
//!
//! Deposit lifecycle and the withdrawal decision.

pub mod deposit;
pub mod errors;
