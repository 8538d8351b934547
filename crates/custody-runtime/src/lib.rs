//! # Custody Runtime Library
//!
//! Wires the custody components together and feeds them mailbox envelopes.
//!
//! ## Modules
//!
//! - `container`: configuration and component wiring
//! - `dispatcher`: routes an envelope to the component honouring its action
//! - `mailbox`: NDJSON envelope parsing

pub mod container;
pub mod dispatcher;
pub mod mailbox;

pub use container::{CustodyConfig, CustodyContainer};
pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher};
pub use mailbox::{Envelope, MailboxError};
