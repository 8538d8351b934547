//! # Domain Layer
//!
//! Payload schema: selectors, word layout and typed bodies.

pub mod actions;
pub mod errors;
pub mod kind;
pub mod words;
