//! # Adapters

pub mod memory;
