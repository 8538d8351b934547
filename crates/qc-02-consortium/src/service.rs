//! Consortium Service
//!
//! Holds the current validator set plus history, and answers
//! `verify(payload, proof)` for every consuming module.

use crate::domain::errors::{ConsortiumError, ConsortiumResult};
use crate::domain::proof::SignatureProof;
use crate::domain::quorum::check_quorum;
use crate::domain::validator_set::ValidatorSet;
use crate::events::ConsortiumEvent;
use crate::ports::inbound::{PayloadVerifier, VerifiedPayload};
use parking_lot::RwLock;
use qc_01_action_codec::{decode, payload_hash, Action, ActionKind, CodecError, NewValidatorSet};
use shared_types::{AccessControl, Address, EventLog, Hash, Role};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Consortium configuration
#[derive(Clone, Debug)]
pub struct ConsortiumConfig {
    /// Upper bound on validators per set
    pub max_validators: usize,
}

impl Default for ConsortiumConfig {
    fn default() -> Self {
        Self {
            max_validators: 102,
        }
    }
}

#[derive(Default)]
struct ConsortiumState {
    /// Every set ever installed, by epoch
    history: BTreeMap<u64, ValidatorSet>,
    current_epoch: Option<u64>,
}

impl ConsortiumState {
    fn current(&self) -> ConsortiumResult<&ValidatorSet> {
        self.current_epoch
            .and_then(|epoch| self.history.get(&epoch))
            .ok_or(ConsortiumError::NotInitialized)
    }
}

/// Validator-set store and signature verifier.
pub struct Consortium {
    config: ConsortiumConfig,
    state: RwLock<ConsortiumState>,
    access: RwLock<AccessControl>,
    events: EventLog<ConsortiumEvent>,
}

impl Consortium {
    pub fn new(config: ConsortiumConfig, owner: Address) -> Self {
        Self {
            config,
            state: RwLock::new(ConsortiumState::default()),
            access: RwLock::new(AccessControl::with_admin(owner)),
            events: EventLog::new(),
        }
    }

    /// One-time, owner-only bootstrap with an unsigned set.
    pub fn initialize_validator_set(
        &self,
        caller: &Address,
        action: &NewValidatorSet,
    ) -> ConsortiumResult<u64> {
        self.access.read().ensure(Role::Admin, caller)?;

        let mut state = self.state.write();
        if let Ok(current) = state.current() {
            return Err(ConsortiumError::AlreadyInitialized {
                epoch: current.epoch(),
            });
        }

        let set = ValidatorSet::from_action(action, self.config.max_validators)?;
        let epoch = set.epoch();
        info!(
            epoch,
            validators = set.len(),
            threshold = set.threshold(),
            "[qc-02] Validator set initialized"
        );
        self.install(&mut state, set);
        Ok(epoch)
    }

    /// Bootstrap from an encoded (unsigned) `NewValidatorSet` payload.
    pub fn initialize_from_payload(&self, caller: &Address, payload: &[u8]) -> ConsortiumResult<u64> {
        let action: NewValidatorSet = decode(payload)?;
        self.initialize_validator_set(caller, &action)
    }

    /// Replace the current set with one it signed itself.
    ///
    /// The proof is checked against the *current* set; the new epoch must be
    /// exactly current + 1 and the height must advance.
    pub fn rotate(&self, payload: &[u8], proof: &[u8]) -> ConsortiumResult<u64> {
        let mut state = self.state.write();
        let verified = Self::verify_against(&state, payload, proof)?;

        let action = match verified.action {
            Action::NewValidatorSet(action) => action,
            other => {
                return Err(CodecError::InvalidAction {
                    expected: ActionKind::NewValidatorSet,
                    actual: other.kind(),
                }
                .into())
            }
        };

        let current = state.current()?;
        let expected = current
            .epoch()
            .checked_add(1)
            .ok_or(ConsortiumError::EpochExhausted {
                current: current.epoch(),
            })?;
        if action.epoch != expected {
            warn!(expected, actual = action.epoch, "[qc-02] Rotation rejected: bad epoch");
            return Err(ConsortiumError::InvalidEpoch {
                expected,
                actual: action.epoch,
            });
        }
        if action.height <= current.height() {
            return Err(ConsortiumError::InvalidHeight {
                current: current.height(),
                proposed: action.height,
            });
        }

        let set = ValidatorSet::from_action(&action, self.config.max_validators)?;
        info!(
            epoch = set.epoch(),
            validators = set.len(),
            threshold = set.threshold(),
            height = set.height(),
            "[qc-02] Validator set rotated"
        );
        self.install(&mut state, set);
        Ok(expected)
    }

    /// Check a proof over an already-computed hash against the current set.
    pub fn check_proof(&self, hash: &Hash, proof: &[u8]) -> ConsortiumResult<u64> {
        let state = self.state.read();
        let set = state.current()?;
        let proof = SignatureProof::decode(proof)?;
        check_quorum(set, hash, &proof)
    }

    /// Current epoch, if initialized.
    pub fn epoch(&self) -> Option<u64> {
        self.state.read().current_epoch
    }

    /// Snapshot of the current set.
    pub fn current_validator_set(&self) -> ConsortiumResult<ValidatorSet> {
        self.state.read().current().cloned()
    }

    /// Snapshot of the set installed at `epoch`, current or historical.
    pub fn validator_set(&self, epoch: u64) -> Option<ValidatorSet> {
        self.state.read().history.get(&epoch).cloned()
    }

    pub fn events(&self) -> &EventLog<ConsortiumEvent> {
        &self.events
    }

    fn install(&self, state: &mut ConsortiumState, set: ValidatorSet) {
        self.events.emit(ConsortiumEvent::ValidatorSetUpdated {
            epoch: set.epoch(),
            validators: set.addresses(),
            weights: set.validators().iter().map(|v| v.weight).collect(),
            threshold: set.threshold(),
            height: set.height(),
        });
        state.current_epoch = Some(set.epoch());
        state.history.insert(set.epoch(), set);
    }

    fn verify_against(
        state: &ConsortiumState,
        payload: &[u8],
        proof: &[u8],
    ) -> ConsortiumResult<VerifiedPayload> {
        let set = state.current()?;
        let action = Action::decode(payload)?;
        let hash = payload_hash(payload);
        let proof = SignatureProof::decode(proof)?;

        match check_quorum(set, &hash, &proof) {
            Ok(signed_weight) => {
                debug!(
                    epoch = set.epoch(),
                    payload_hash = %hex::encode(hash),
                    action = %action.kind(),
                    signed_weight,
                    threshold = set.threshold(),
                    "[qc-02] Proof verified"
                );
                Ok(VerifiedPayload {
                    action,
                    payload_hash: hash,
                    epoch: set.epoch(),
                    signed_weight,
                })
            }
            Err(e) => {
                warn!(
                    epoch = set.epoch(),
                    payload_hash = %hex::encode(hash),
                    error = %e,
                    "[qc-02] Proof rejected"
                );
                Err(e)
            }
        }
    }
}

impl PayloadVerifier for Consortium {
    fn verify(&self, payload: &[u8], proof: &[u8]) -> ConsortiumResult<VerifiedPayload> {
        let state = self.state.read();
        Self::verify_against(&state, payload, proof)
    }
}
