//! Bascule Service
//!
//! Second, independent gate for deposit-backed releases. A designated
//! reporter vouches for deposits; validators consume them on withdrawal.

use crate::domain::deposit::{DepositId, DepositState, WithdrawalOutcome};
use crate::domain::errors::{BasculeError, BasculeResult};
use crate::events::BasculeEvent;
use crate::ports::inbound::WithdrawalGate;
use parking_lot::RwLock;
use shared_crypto::{eth_signed_message_hash, signer_matches, EcdsaSignature};
use shared_types::{
    AccessControl, Address, EventLog, Hash, OneShotGrants, PauseSwitch, Role, ZERO_ADDRESS,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Bascule configuration.
///
/// No `Default`: the trusted signer must always be chosen.
/// [`ZERO_ADDRESS`] disables per-deposit signature checks.
#[derive(Clone, Debug)]
pub struct BasculeConfig {
    /// Upper bound on deposits per report
    pub max_deposits: usize,
    /// Withdrawals at or above this amount must have been reported
    pub validate_threshold: u64,
    /// Signer of per-deposit report proofs
    pub trusted_signer: Address,
}

impl BasculeConfig {
    pub fn new(trusted_signer: Address) -> Self {
        Self {
            max_deposits: 100,
            validate_threshold: 0,
            trusted_signer,
        }
    }
}

/// Outcome of a report call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Newly moved to `Reported`
    pub newly_reported: usize,
    /// Were already `Reported` or `Withdrawn`
    pub already_reported: usize,
}

struct BasculeState {
    deposits: HashMap<DepositId, DepositState>,
    max_deposits: usize,
    validate_threshold: u64,
    trusted_signer: Address,
    access: AccessControl,
    guardians: OneShotGrants,
    pause: PauseSwitch,
}

/// Deposit notarization gate.
pub struct Bascule {
    state: RwLock<BasculeState>,
    events: EventLog<BasculeEvent>,
}

impl Bascule {
    pub fn new(config: BasculeConfig, admin: Address) -> Self {
        if config.trusted_signer == ZERO_ADDRESS {
            warn!("[qc-04] Trusted signer is zero: per-deposit report proofs are not checked");
        }
        Self {
            state: RwLock::new(BasculeState {
                deposits: HashMap::new(),
                max_deposits: config.max_deposits,
                validate_threshold: config.validate_threshold,
                trusted_signer: config.trusted_signer,
                access: AccessControl::with_admin(admin),
                guardians: OneShotGrants::default(),
                pause: PauseSwitch::default(),
            }),
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // ROLES
    // =========================================================================

    /// Admin grants a role.
    pub fn grant_role(&self, caller: &Address, role: Role, account: Address) -> BasculeResult<()> {
        self.state.write().access.grant_as(caller, role, account)?;
        Ok(())
    }

    /// Admin revokes a role.
    pub fn revoke_role(&self, caller: &Address, role: Role, account: Address) -> BasculeResult<()> {
        self.state.write().access.revoke_as(caller, role, account)?;
        Ok(())
    }

    /// Admin issues a one-shot guardian capability to `account`.
    pub fn grant_guardian(&self, caller: &Address, account: Address) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.guardians.issue(Role::ValidationGuardian, account);
        Ok(())
    }

    /// Admin withdraws an unused guardian capability. Returns whether one was held.
    pub fn revoke_guardian(&self, caller: &Address, account: &Address) -> BasculeResult<bool> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        let revoked = state.guardians.revoke(Role::ValidationGuardian, account);
        if revoked {
            info!(guardian = %hex::encode(account), "[qc-04] Guardian capability revoked");
        }
        Ok(revoked)
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        let state = self.state.read();
        match role {
            Role::ValidationGuardian => state.guardians.holds(role, account),
            _ => state.access.has_role(role, account),
        }
    }

    // =========================================================================
    // REPORTS
    // =========================================================================

    /// Report a batch of deposits.
    ///
    /// All proofs are checked before any state changes; re-reporting is a
    /// per-item no-op flagged with `DepositAlreadyReported`.
    pub fn report_deposits(
        &self,
        caller: &Address,
        report_id: Hash,
        deposit_ids: &[DepositId],
        proofs: &[Vec<u8>],
    ) -> BasculeResult<ReportSummary> {
        let mut state = self.state.write();
        state.pause.ensure_not_paused()?;
        state.access.ensure(Role::DepositReporter, caller)?;

        if deposit_ids.len() > state.max_deposits {
            return Err(BasculeError::BadDepositReport {
                count: deposit_ids.len(),
                max: state.max_deposits,
            });
        }
        if deposit_ids.len() != proofs.len() {
            return Err(BasculeError::BadDepositProofsSize {
                deposits: deposit_ids.len(),
                proofs: proofs.len(),
            });
        }

        if state.trusted_signer != ZERO_ADDRESS {
            for (deposit_id, proof) in deposit_ids.iter().zip(proofs) {
                verify_report_proof(&state.trusted_signer, deposit_id, proof)?;
            }
        }

        let mut summary = ReportSummary::default();
        for deposit_id in deposit_ids {
            let current = state.deposits.entry(*deposit_id).or_default();
            if current.can_transition_to(DepositState::Reported) {
                *current = DepositState::Reported;
                summary.newly_reported += 1;
            } else {
                summary.already_reported += 1;
                debug!(deposit_id = %hex::encode(deposit_id), "[qc-04] Deposit already reported");
                self.events.emit(BasculeEvent::DepositAlreadyReported {
                    deposit_id: *deposit_id,
                });
            }
        }

        info!(
            report_id = %hex::encode(report_id),
            count = deposit_ids.len(),
            newly_reported = summary.newly_reported,
            "[qc-04] Deposits reported"
        );
        self.events.emit(BasculeEvent::DepositsReported {
            report_id,
            count: deposit_ids.len(),
        });
        Ok(summary)
    }

    pub fn deposit_state(&self, deposit_id: &DepositId) -> DepositState {
        self.state
            .read()
            .deposits
            .get(deposit_id)
            .copied()
            .unwrap_or_default()
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn validate_threshold(&self) -> u64 {
        self.state.read().validate_threshold
    }

    pub fn max_deposits(&self) -> usize {
        self.state.read().max_deposits
    }

    pub fn trusted_signer(&self) -> Address {
        self.state.read().trusted_signer
    }

    /// Raise (guardian, once) or lower (admin) the validation threshold.
    pub fn update_validate_threshold(&self, caller: &Address, new_value: u64) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.pause.ensure_not_paused()?;

        let old = state.validate_threshold;
        if new_value == old {
            return Err(BasculeError::SameValidationThreshold { value: old });
        }

        if new_value > old {
            let capability = state.guardians.take(Role::ValidationGuardian, caller)?;
            let guardian = capability.exercise();
            info!(guardian = %hex::encode(guardian), old, new = new_value, "[qc-04] Guardian raised threshold");
        } else {
            state.access.ensure(Role::Admin, caller)?;
        }

        state.validate_threshold = new_value;
        self.events.emit(BasculeEvent::ValidateThresholdUpdated {
            old,
            new: new_value,
        });
        Ok(())
    }

    pub fn update_max_deposits(&self, caller: &Address, new_value: usize) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        let old = std::mem::replace(&mut state.max_deposits, new_value);
        self.events.emit(BasculeEvent::MaxDepositsUpdated {
            old,
            new: new_value,
        });
        Ok(())
    }

    /// Replace the trusted signer. The zero address disables report proofs.
    pub fn update_trusted_signer(&self, caller: &Address, signer: Address) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        if signer == ZERO_ADDRESS {
            warn!("[qc-04] Trusted signer cleared: per-deposit report proofs are not checked");
        }
        let old = std::mem::replace(&mut state.trusted_signer, signer);
        self.events.emit(BasculeEvent::TrustedSignerUpdated { old, new: signer });
        Ok(())
    }

    // =========================================================================
    // PAUSE
    // =========================================================================

    pub fn pause(&self, caller: &Address) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Pauser, caller)?;
        state.pause.pause()?;
        self.events.emit(BasculeEvent::Paused { account: *caller });
        Ok(())
    }

    /// Lifting the pause takes the admin, not the pauser.
    pub fn unpause(&self, caller: &Address) -> BasculeResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.pause.unpause()?;
        self.events.emit(BasculeEvent::Unpaused { account: *caller });
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().pause.is_paused()
    }

    pub fn events(&self) -> &EventLog<BasculeEvent> {
        &self.events
    }
}

/// Decide a withdrawal against current state without mutating it.
fn decide(state: &BasculeState, deposit_id: &DepositId, amount: u64) -> BasculeResult<WithdrawalOutcome> {
    match state.deposits.get(deposit_id).copied().unwrap_or_default() {
        DepositState::Withdrawn => Err(BasculeError::AlreadyWithdrawn {
            deposit_id: *deposit_id,
        }),
        DepositState::Reported => Ok(WithdrawalOutcome::Validated),
        DepositState::Unreported if amount < state.validate_threshold => {
            Ok(WithdrawalOutcome::NotValidated)
        }
        DepositState::Unreported => Err(BasculeError::WithdrawalFailedValidation {
            deposit_id: *deposit_id,
            amount,
            threshold: state.validate_threshold,
        }),
    }
}

fn verify_report_proof(signer: &Address, deposit_id: &DepositId, proof: &[u8]) -> BasculeResult<()> {
    let bad = |reason: String| BasculeError::BadDepositProof {
        deposit_id: *deposit_id,
        reason,
    };
    let signature = EcdsaSignature::from_slice(proof).map_err(|e| bad(e.to_string()))?;
    let digest = eth_signed_message_hash(deposit_id);
    match signer_matches(&digest, &signature, signer) {
        Ok(true) => Ok(()),
        Ok(false) => Err(bad("not signed by trusted signer".into())),
        Err(e) => Err(bad(e.to_string())),
    }
}

impl WithdrawalGate for Bascule {
    fn check_withdrawal(
        &self,
        caller: &Address,
        deposit_id: &DepositId,
        amount: u64,
    ) -> BasculeResult<WithdrawalOutcome> {
        let state = self.state.read();
        state.pause.ensure_not_paused()?;
        state.access.ensure(Role::WithdrawalValidator, caller)?;
        decide(&state, deposit_id, amount)
    }

    fn validate_withdrawal(
        &self,
        caller: &Address,
        deposit_id: DepositId,
        amount: u64,
    ) -> BasculeResult<WithdrawalOutcome> {
        let mut state = self.state.write();
        state.pause.ensure_not_paused()?;
        state.access.ensure(Role::WithdrawalValidator, caller)?;

        let outcome = match decide(&state, &deposit_id, amount) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(deposit_id = %hex::encode(deposit_id), amount, error = %e, "[qc-04] Withdrawal rejected");
                return Err(e);
            }
        };
        state.deposits.insert(deposit_id, DepositState::Withdrawn);

        let event = match outcome {
            WithdrawalOutcome::Validated => BasculeEvent::WithdrawalValidated { deposit_id, amount },
            WithdrawalOutcome::NotValidated => {
                BasculeEvent::WithdrawalNotValidated { deposit_id, amount }
            }
        };
        info!(deposit_id = %hex::encode(deposit_id), amount, ?outcome, "[qc-04] Withdrawal validated");
        self.events.emit(event);
        Ok(outcome)
    }
}
