//! # Domain Layer
//!
//! Route table and Bitcoin output rules. No I/O.

pub mod bitcoin;
pub mod errors;
pub mod routes;
