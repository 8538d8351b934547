//! Outgoing consortium events.

use serde::Serialize;
use shared_types::Address;

/// Emitted on bootstrap and on every successful rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConsortiumEvent {
    ValidatorSetUpdated {
        epoch: u64,
        validators: Vec<Address>,
        weights: Vec<u64>,
        threshold: u64,
        height: u64,
    },
}
