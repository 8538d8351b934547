//! Ports Layer

pub mod inbound;
