//! # Deposit Notarization Gate (QC-04)
//!
//! A second line of defence in front of deposit-backed releases,
//! independent of the notary quorum.
//!
//! ## Lifecycle
//!
//! ```text
//! Unreported --report--> Reported --validate--> Withdrawn
//!      \_______________ below threshold _________/
//! ```
//!
//! ## Roles
//!
//! | Role | May |
//! |------|-----|
//! | `deposit-reporter` | report deposits |
//! | `withdrawal-validator` | validate withdrawals |
//! | `validation-guardian` | raise the threshold, once |
//! | `admin` | lower the threshold, configure, unpause |
//! | `pauser` | pause |

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::deposit::{DepositId, DepositState, WithdrawalOutcome};
pub use domain::errors::{BasculeError, BasculeResult};
pub use events::BasculeEvent;
pub use ports::inbound::WithdrawalGate;
pub use service::{Bascule, BasculeConfig, ReportSummary};
