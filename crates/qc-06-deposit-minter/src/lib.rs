//! # Deposit Minter (QC-06)
//!
//! Consuming module of the custody core: turns notarized bitcoin deposits
//! into token credits and token burns into bitcoin payout requests.
//!
//! ## Entry Points
//!
//! | Call | Payload | Role |
//! |------|---------|------|
//! | `mint` / `batch_mint` | `DepositV0` | any |
//! | `mint_v1` / `batch_mint_v1` | `DepositV1` | any |
//! | `mint_v1_with_fee` / `batch_mint_v1_with_fee` | `DepositV1` + `FeeApproval` | `claimer` |
//! | `redeem` | none | any holder |
//!
//! ## Batches
//!
//! Every item is verified first; any failure other than a replay aborts
//! the whole batch. Replayed items are skipped with `BatchMintSkipped`.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::deposit::NotarizedDeposit;
pub use domain::errors::{MinterError, MinterResult};
pub use domain::fee::{charged_fee, verify_fee_approval};
pub use events::MinterEvent;
pub use ports::inbound::DepositSink;
pub use service::{
    BatchOutcome, DepositMinter, FeeClaim, MintReceipt, MinterConfig, RedeemReceipt,
};
