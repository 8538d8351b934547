//! # Integration Flows
//!
//! Cross-component behaviour of a wired deployment:
//!
//! - `minting`: single, batch, and fee-charging deposit mints
//! - `redeem`: dust and commission rules on the way out
//! - `rotation`: validator-set succession
//! - `bascule`: deposit reports, withdrawal gating, guardian capability
//! - `staking`: request and receipt round trip between two routers
//! - `quorum`: property tests for the weighted threshold

pub mod bascule;
pub mod minting;
pub mod quorum;
pub mod redeem;
pub mod rotation;
pub mod staking;
