//! # Anti-Replay Ledger (QC-03)
//!
//! Records which payload hashes each consumer scope has acted upon.
//!
//! - `try_consume` is a single check-and-set; two concurrent submissions of
//!   the same hash cannot both observe `Fresh`
//! - Scopes are independent: one hash may be consumed once per scope
//! - `try_consume_all` records a whole set or nothing, and `plan_batch`
//!   picks the fresh items of a batch beforehand

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::memory::{InMemoryReplayLedger, ReplayLedgerStats};
pub use domain::batch::{plan_batch, BatchPlan};
pub use domain::{Consumption, ReplayError, ScopeId};
pub use ports::ReplayLedger;
