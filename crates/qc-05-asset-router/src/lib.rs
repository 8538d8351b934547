//! # Asset Router (QC-05)
//!
//! Where a token may go, and what a Bitcoin redeem nets after fees.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): route table, output classification, dust rule
//! - **Ports Layer** (`ports/`): [`RouteResolver`], queried by consuming modules
//! - **Service Layer** (`service.rs`): [`StakingRouter`] request/receipt flow
//!
//! ## Staking Flow
//!
//! ```text
//! origin:       start_staking ──burn──▶ StakingOperationRequest ──▶ notaries
//! destination:  StakingReceipt + proof ──verify──▶ consume ──▶ mint
//! ```
//!
//! Requests and receipts are independent messages. A request with no
//! receipt leaves the burned amount unreleased.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::bitcoin::{
    calc_unstake_request_amount, dust_limit, OutputType, UnstakeAmount, DEFAULT_DUST_FEE_RATE,
};
pub use domain::errors::{RouterError, RouterResult};
pub use domain::routes::{Route, RouteTable};
pub use events::RouterEvent;
pub use ports::inbound::RouteResolver;
pub use service::{
    NativeRedeemIssued, RouterConfig, StakingFinalized, StakingRequestIssued, StakingRouter,
    NATIVE_TOKEN_NAME,
};
