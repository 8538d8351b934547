//! # Container Module
//!
//! Configuration and component wiring.

pub mod config;
pub mod subsystems;

pub use config::{
    BasculeSection, ConfigError, ConsortiumSection, CustodyConfig, IdentityConfig, MinterSection,
    RouterSection,
};
pub use subsystems::{CustodyContainer, WiringError};
