//! # Exploit Simulations
//!
//! Attacks a hostile relayer or insider could attempt against the custody
//! core. Every test asserts the attack fails and leaves state untouched.

pub mod forged_proofs;
pub mod privilege;
pub mod replay;
