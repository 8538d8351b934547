//! # Domain Layer
//!
//! Deposit semantics and fee-approval rules. No I/O.

pub mod deposit;
pub mod errors;
pub mod fee;
