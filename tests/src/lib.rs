//! # Quorum-Custody Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared deployment harness
//! ├── integration/      # Cross-component flows
//! └── exploits/         # Replay, forgery, and privilege attacks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::
//! cargo test -p qc-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod exploits;
pub mod fixtures;
pub mod integration;
