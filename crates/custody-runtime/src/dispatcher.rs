//! # Payload Dispatcher
//!
//! Routes mailbox envelopes to the component that honours their action:
//!
//! | Action | Target |
//! |--------|--------|
//! | `DepositV0` / `DepositV1` | deposit minter |
//! | `StakingReceipt` | staking router |
//! | `NewValidatorSet` | consortium rotation |
//!
//! Report envelopes go to the Bascule under the runtime's reporter account.
//! Other actions are produced by this deployment, never consumed by it,
//! and are rejected.

use std::sync::Arc;

use thiserror::Error;

use qc_01_action_codec::{payload_hash, peek_kind, ActionKind, CodecError};
use qc_02_consortium::ConsortiumError;
use qc_04_bascule::{BasculeError, ReportSummary, WithdrawalOutcome};
use qc_05_asset_router::{RouterError, StakingFinalized};
use qc_06_deposit_minter::{BatchOutcome, DepositSink, MintReceipt, MinterError};
use qc_telemetry::{
    log_payload_event, metric_inc, time_histogram, BATCH_SKIPS, DEPOSITS_REPORTED, DISPATCH_DURATION,
    DISPATCH_ERRORS, PAYLOADS_CONSUMED, PAYLOADS_VERIFIED, PROOF_FAILURES, VALIDATOR_EPOCH,
    WITHDRAWALS,
};

use shared_types::Hash;

use crate::container::CustodyContainer;
use crate::mailbox::Envelope;

/// Dispatch failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Minter(#[from] MinterError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Consortium(#[from] ConsortiumError),

    #[error(transparent)]
    Bascule(#[from] BasculeError),

    /// Report received while the Bascule is not deployed
    #[error("bascule is not enabled")]
    BasculeDisabled,

    /// Action has no consumer in this deployment
    #[error("no handler for {kind} payloads")]
    Unroutable { kind: ActionKind },
}

impl DispatchError {
    fn module(&self) -> &'static str {
        match self {
            DispatchError::Codec(_)
            | DispatchError::Unroutable { .. }
            | DispatchError::BasculeDisabled => "runtime",
            DispatchError::Bascule(_) => "qc-04",
            DispatchError::Minter(_) => "qc-06",
            DispatchError::Router(_) => "qc-05",
            DispatchError::Consortium(_) => "qc-02",
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            DispatchError::Codec(_) => "codec",
            DispatchError::Unroutable { .. } | DispatchError::BasculeDisabled => "unroutable",
            DispatchError::Minter(MinterError::Replay(_))
            | DispatchError::Router(RouterError::Replay(_)) => "replay",
            DispatchError::Minter(MinterError::Bascule(_)) | DispatchError::Bascule(_) => "bascule",
            _ if self.proof_failure().is_some() => "proof",
            _ => "rejected",
        }
    }

    /// Consortium cause, wherever it surfaced.
    fn proof_failure(&self) -> Option<&ConsortiumError> {
        match self {
            DispatchError::Consortium(e)
            | DispatchError::Minter(MinterError::Consortium(e))
            | DispatchError::Router(RouterError::Consortium(e)) => Some(e),
            _ => None,
        }
    }
}

fn proof_failure_reason(error: &ConsortiumError) -> &'static str {
    match error {
        ConsortiumError::NotInitialized => "not_initialized",
        ConsortiumError::BadProof { .. } => "bad_proof",
        ConsortiumError::NotEnoughSignatures { .. } => "not_enough_signatures",
        ConsortiumError::SignatureCountMismatch { .. } => "signature_count_mismatch",
        ConsortiumError::InvalidEpoch { .. }
        | ConsortiumError::EpochExhausted { .. }
        | ConsortiumError::InvalidHeight { .. } => "invalid_rotation",
        ConsortiumError::Codec(_) => "codec",
        _ => "other",
    }
}

/// What a dispatched envelope achieved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Minted(MintReceipt),
    BatchMinted(BatchOutcome),
    StakingFinalized(StakingFinalized),
    ValidatorSetRotated { epoch: u64 },
    DepositsReported(ReportSummary),
}

/// Routes envelopes into the container's components.
pub struct Dispatcher {
    container: Arc<CustodyContainer>,
}

impl Dispatcher {
    pub fn new(container: Arc<CustodyContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &CustodyContainer {
        &self.container
    }

    /// Dispatch one envelope and record its metrics.
    pub fn dispatch(&self, envelope: &Envelope) -> Result<DispatchOutcome, DispatchError> {
        let _timer = time_histogram!(DISPATCH_DURATION);
        let result = match envelope {
            Envelope::Single { payload, proof } => self.dispatch_single(payload, proof),
            Envelope::Batch { payloads, proofs } => self.dispatch_batch(payloads, proofs),
            Envelope::Report {
                report_id,
                deposit_ids,
                proofs,
            } => self.dispatch_report(*report_id, deposit_ids, proofs),
        };
        if let Err(e) = &result {
            metric_inc!(DISPATCH_ERRORS, &[e.module(), e.error_type()]);
            if let Some(cause) = e.proof_failure() {
                metric_inc!(PROOF_FAILURES, &[proof_failure_reason(cause)]);
            }
        }
        result
    }

    fn dispatch_single(&self, payload: &[u8], proof: &[u8]) -> Result<DispatchOutcome, DispatchError> {
        let kind = peek_kind(payload)?;
        let hash = hex::encode(payload_hash(payload));
        log_payload_event!(debug, "runtime", "[runtime] Dispatching payload", hash, %kind);

        let outcome = match kind {
            ActionKind::DepositV0 | ActionKind::DepositV1 => {
                let receipt = self.container.minter.deposit(kind, payload, proof)?;
                record_mint(&receipt);
                DispatchOutcome::Minted(receipt)
            }
            ActionKind::StakingReceipt => {
                let finalized = self.container.router.finalize_staking(payload, proof)?;
                metric_inc!(PAYLOADS_CONSUMED, &["qc-05"]);
                DispatchOutcome::StakingFinalized(finalized)
            }
            ActionKind::NewValidatorSet => {
                let epoch = self.container.consortium.rotate(payload, proof)?;
                VALIDATOR_EPOCH.set(epoch as f64);
                DispatchOutcome::ValidatorSetRotated { epoch }
            }
            other => {
                log_payload_event!(warn, "runtime", "[runtime] Payload has no consumer", hash, kind = %other);
                return Err(DispatchError::Unroutable { kind: other });
            }
        };

        metric_inc!(PAYLOADS_VERIFIED, &[kind.to_string().as_str()]);
        log_payload_event!(info, "runtime", "[runtime] Payload honoured", hash, %kind);
        Ok(outcome)
    }

    fn dispatch_batch(
        &self,
        payloads: &[Vec<u8>],
        proofs: &[Vec<u8>],
    ) -> Result<DispatchOutcome, DispatchError> {
        let kind = match payloads.first() {
            Some(first) => peek_kind(first)?,
            None => ActionKind::DepositV0,
        };
        let minter = &self.container.minter;
        let outcome = match kind {
            ActionKind::DepositV0 => minter.batch_mint(payloads, proofs)?,
            ActionKind::DepositV1 => minter.batch_mint_v1(payloads, proofs)?,
            other => return Err(DispatchError::Unroutable { kind: other }),
        };

        for receipt in &outcome.minted {
            record_mint(receipt);
            metric_inc!(PAYLOADS_VERIFIED, &[kind.to_string().as_str()]);
        }
        BATCH_SKIPS.inc_by(outcome.skipped.len() as f64);
        tracing::info!(
            minted = outcome.minted.len(),
            skipped = outcome.skipped.len(),
            total = outcome.total_minted(),
            "[runtime] Batch honoured"
        );
        Ok(DispatchOutcome::BatchMinted(outcome))
    }

    fn dispatch_report(
        &self,
        report_id: Hash,
        deposit_ids: &[Hash],
        proofs: &[Vec<u8>],
    ) -> Result<DispatchOutcome, DispatchError> {
        let bascule = self
            .container
            .bascule
            .as_ref()
            .ok_or(DispatchError::BasculeDisabled)?;
        let reporter = self.container.config.identity.reporter_address;
        let summary = bascule.report_deposits(&reporter, report_id, deposit_ids, proofs)?;
        DEPOSITS_REPORTED.inc_by(summary.newly_reported as f64);
        Ok(DispatchOutcome::DepositsReported(summary))
    }
}

fn record_mint(receipt: &MintReceipt) {
    metric_inc!(PAYLOADS_CONSUMED, &["qc-06"]);
    let outcome = match receipt.bascule {
        Some(WithdrawalOutcome::Validated) => "validated",
        Some(WithdrawalOutcome::NotValidated) => "not_validated",
        None => "ungated",
    };
    metric_inc!(WITHDRAWALS, &[outcome]);
}
