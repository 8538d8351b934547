//! Deposit Minter Service
//!
//! Releases the minter's token against notarized bitcoin deposits and burns
//! it again on redeem. Every release passes, in order:
//!
//! 1. quorum verification (`PayloadVerifier`)
//! 2. semantic checks (chain, token, amount, recipient)
//! 3. the Bascule gate prediction and the ledger credit check
//! 4. the anti-replay ledger, scoped to this minter
//!
//! Nothing is consumed until steps 1-3 pass for every item of the call.

use crate::domain::deposit::NotarizedDeposit;
use crate::domain::errors::{MinterError, MinterResult};
use crate::domain::fee::{charged_fee, verify_fee_approval};
use crate::events::MinterEvent;
use crate::ports::inbound::DepositSink;
use parking_lot::{Mutex, RwLock};
use qc_01_action_codec::{deposit_id, ActionKind};
use qc_02_consortium::PayloadVerifier;
use qc_03_replay_ledger::{plan_batch, ReplayError, ReplayLedger, ScopeId};
use qc_04_bascule::{WithdrawalGate, WithdrawalOutcome};
use qc_05_asset_router::{calc_unstake_request_amount, DEFAULT_DUST_FEE_RATE};
use shared_types::{
    AccessControl, Address, ChainId, EventLog, Hash, PauseSwitch, Role, TokenId, TokenLedger,
    ZERO_ADDRESS,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Minter configuration
#[derive(Clone, Debug)]
pub struct MinterConfig {
    /// Deposits must target this chain
    pub chain_id: ChainId,
    /// Token minted and burned here
    pub token: TokenId,
    /// Receives claimer fees and redeem commissions
    pub treasury: Address,
    /// Flat commission deducted on redeem
    pub burn_commission: u64,
    /// sat/kvB used for the dust limit
    pub dust_fee_rate: u64,
    /// Cap on any user-approved claimer fee
    pub maximum_fee: u64,
    pub withdrawals_enabled: bool,
}

impl Default for MinterConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::evm(1),
            token: TokenId::default(),
            treasury: ZERO_ADDRESS,
            burn_commission: 0,
            dust_fee_rate: DEFAULT_DUST_FEE_RATE,
            maximum_fee: 0,
            withdrawals_enabled: false,
        }
    }
}

/// One honoured deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub payload_hash: Hash,
    pub deposit_id: Hash,
    pub recipient: Address,
    /// Credited to the recipient
    pub amount: u64,
    /// Credited to the treasury
    pub fee: u64,
    /// `None` when no Bascule is attached
    pub bascule: Option<WithdrawalOutcome>,
}

/// Result of a batch call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub minted: Vec<MintReceipt>,
    pub skipped: Vec<Hash>,
}

impl BatchOutcome {
    /// Recipient credits plus fees.
    pub fn total_minted(&self) -> u128 {
        self.minted
            .iter()
            .map(|r| u128::from(r.amount) + u128::from(r.fee))
            .sum()
    }
}

/// Result of [`DepositMinter::redeem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedeemReceipt {
    pub script_pubkey: Vec<u8>,
    pub amount_after_fee: u64,
    pub commission: u64,
}

/// Fee-approval inputs for one deposit.
pub struct FeeClaim<'a> {
    pub fee_payload: &'a [u8],
    pub user_signature: &'a [u8],
}

struct Prepared {
    deposit: NotarizedDeposit,
    payload_hash: Hash,
    deposit_id: Hash,
    fee: u64,
    user_signature: Vec<u8>,
}

struct MinterState {
    access: AccessControl,
    pause: PauseSwitch,
    burn_commission: u64,
    dust_fee_rate: u64,
    maximum_fee: u64,
    withdrawals_enabled: bool,
    bascule: Option<Arc<dyn WithdrawalGate>>,
}

pub struct DepositMinter {
    chain_id: ChainId,
    token: TokenId,
    treasury: Address,
    scope: ScopeId,
    state: RwLock<MinterState>,
    /// Serializes check-then-apply so prechecks stay valid until applied
    commit: Mutex<()>,
    verifier: Arc<dyn PayloadVerifier>,
    replay: Arc<dyn ReplayLedger>,
    ledger: Arc<dyn TokenLedger>,
    events: EventLog<MinterEvent>,
}

impl DepositMinter {
    /// `scope` doubles as the minter's account toward the Bascule.
    pub fn new(
        config: MinterConfig,
        admin: Address,
        scope: ScopeId,
        verifier: Arc<dyn PayloadVerifier>,
        replay: Arc<dyn ReplayLedger>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self {
            chain_id: config.chain_id,
            token: config.token,
            treasury: config.treasury,
            scope,
            state: RwLock::new(MinterState {
                access: AccessControl::with_admin(admin),
                pause: PauseSwitch::default(),
                burn_commission: config.burn_commission,
                dust_fee_rate: config.dust_fee_rate,
                maximum_fee: config.maximum_fee,
                withdrawals_enabled: config.withdrawals_enabled,
                bascule: None,
            }),
            commit: Mutex::new(()),
            verifier,
            replay,
            ledger,
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // SINGLE MINTS
    // =========================================================================

    /// Mint against a `DepositV0` (implicit token).
    pub fn mint(&self, payload: &[u8], proof: &[u8]) -> MinterResult<MintReceipt> {
        let gate = self.gate()?;
        let item = self.prepare(payload, proof, ActionKind::DepositV0)?;
        self.mint_single(gate.as_deref(), item)
    }

    /// Mint against a `DepositV1` naming this minter's token.
    pub fn mint_v1(&self, payload: &[u8], proof: &[u8]) -> MinterResult<MintReceipt> {
        let gate = self.gate()?;
        let item = self.prepare(payload, proof, ActionKind::DepositV1)?;
        self.mint_single(gate.as_deref(), item)
    }

    /// Claimer-only V1 mint that deducts a user-approved fee.
    pub fn mint_v1_with_fee(
        &self,
        caller: &Address,
        payload: &[u8],
        proof: &[u8],
        claim: FeeClaim<'_>,
        now: u64,
    ) -> MinterResult<MintReceipt> {
        self.state.read().access.ensure(Role::Claimer, caller)?;
        let gate = self.gate()?;
        let item = self.prepare(payload, proof, ActionKind::DepositV1)?;
        let item = self.with_fee(item, &claim, now)?;
        self.mint_single(gate.as_deref(), item)
    }

    // =========================================================================
    // BATCH MINTS
    // =========================================================================

    pub fn batch_mint(&self, payloads: &[Vec<u8>], proofs: &[Vec<u8>]) -> MinterResult<BatchOutcome> {
        self.batch(ActionKind::DepositV0, payloads, proofs)
    }

    pub fn batch_mint_v1(&self, payloads: &[Vec<u8>], proofs: &[Vec<u8>]) -> MinterResult<BatchOutcome> {
        self.batch(ActionKind::DepositV1, payloads, proofs)
    }

    pub fn batch_mint_v1_with_fee(
        &self,
        caller: &Address,
        payloads: &[Vec<u8>],
        proofs: &[Vec<u8>],
        fee_payloads: &[Vec<u8>],
        user_signatures: &[Vec<u8>],
        now: u64,
    ) -> MinterResult<BatchOutcome> {
        self.state.read().access.ensure(Role::Claimer, caller)?;
        for other in [proofs.len(), fee_payloads.len(), user_signatures.len()] {
            ensure_equal_length(payloads.len(), other)?;
        }
        let gate = self.gate()?;

        let mut items = Vec::with_capacity(payloads.len());
        for (i, payload) in payloads.iter().enumerate() {
            let item = self.prepare(payload, &proofs[i], ActionKind::DepositV1)?;
            let claim = FeeClaim {
                fee_payload: &fee_payloads[i],
                user_signature: &user_signatures[i],
            };
            items.push(self.with_fee(item, &claim, now)?);
        }
        self.apply_batch(gate.as_deref(), items)
    }

    fn batch(
        &self,
        kind: ActionKind,
        payloads: &[Vec<u8>],
        proofs: &[Vec<u8>],
    ) -> MinterResult<BatchOutcome> {
        ensure_equal_length(payloads.len(), proofs.len())?;
        let gate = self.gate()?;
        let items = payloads
            .iter()
            .zip(proofs)
            .map(|(payload, proof)| self.prepare(payload, proof, kind))
            .collect::<MinterResult<Vec<_>>>()?;
        self.apply_batch(gate.as_deref(), items)
    }

    /// Replays are skipped; any other failure leaves every item unapplied.
    fn apply_batch(
        &self,
        gate: Option<&dyn WithdrawalGate>,
        items: Vec<Prepared>,
    ) -> MinterResult<BatchOutcome> {
        let _commit = self.commit.lock();
        let hashes: Vec<Hash> = items.iter().map(|item| item.payload_hash).collect();
        let plan = plan_batch(self.replay.as_ref(), self.scope, &hashes);
        let fresh: Vec<&Prepared> = plan.fresh.iter().map(|&i| &items[i]).collect();
        let mut outcomes = self.apply_all(gate, &fresh)?.into_iter();

        let mut is_fresh = vec![false; items.len()];
        for &i in &plan.fresh {
            is_fresh[i] = true;
        }
        let mut outcome = BatchOutcome::default();
        for (item, fresh) in items.iter().zip(is_fresh) {
            if fresh {
                outcome.minted.push(self.record(item, outcomes.next().flatten()));
            } else {
                warn!(
                    payload_hash = %hex::encode(item.payload_hash),
                    "[qc-06] Batch item already consumed, skipping"
                );
                self.events.emit(MinterEvent::BatchMintSkipped {
                    payload_hash: item.payload_hash,
                });
                outcome.skipped.push(item.payload_hash);
            }
        }
        info!(
            minted = outcome.minted.len(),
            skipped = outcome.skipped.len(),
            "[qc-06] Batch mint applied"
        );
        Ok(outcome)
    }

    // =========================================================================
    // REDEEM
    // =========================================================================

    /// Burn `amount` from `caller` and request a bitcoin payout to `script_pubkey`.
    pub fn redeem(
        &self,
        caller: &Address,
        script_pubkey: &[u8],
        amount: u64,
    ) -> MinterResult<RedeemReceipt> {
        let state = self.state.read();
        state.pause.ensure_not_paused()?;
        if !state.withdrawals_enabled {
            return Err(MinterError::WithdrawalsDisabled);
        }
        let commission = state.burn_commission;
        let unstake =
            calc_unstake_request_amount(script_pubkey, amount, commission, state.dust_fee_rate)?;
        let amount_after_fee = unstake.ensure_redeemable(amount, commission)?;
        drop(state);

        self.ledger.burn(self.token, *caller, amount)?;
        if commission > 0 {
            self.ledger.mint(self.token, self.treasury, commission)?;
        }

        info!(amount, amount_after_fee, commission, "[qc-06] Unstake requested");
        self.events.emit(MinterEvent::UnstakeRequest {
            from: *caller,
            script_pubkey: script_pubkey.to_vec(),
            amount_after_fee,
        });
        Ok(RedeemReceipt {
            script_pubkey: script_pubkey.to_vec(),
            amount_after_fee,
            commission,
        })
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    pub fn grant_role(&self, caller: &Address, role: Role, account: Address) -> MinterResult<bool> {
        Ok(self.state.write().access.grant_as(caller, role, account)?)
    }

    pub fn revoke_role(&self, caller: &Address, role: Role, account: Address) -> MinterResult<bool> {
        Ok(self.state.write().access.revoke_as(caller, role, account)?)
    }

    /// Flip redeem availability. Returns the new setting.
    pub fn toggle_withdrawals(&self, caller: &Address) -> MinterResult<bool> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.withdrawals_enabled = !state.withdrawals_enabled;
        let enabled = state.withdrawals_enabled;
        info!(enabled, "[qc-06] Withdrawals toggled");
        self.events.emit(MinterEvent::WithdrawalsEnabled { enabled });
        Ok(enabled)
    }

    pub fn attach_bascule(&self, caller: &Address, gate: Arc<dyn WithdrawalGate>) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.bascule = Some(gate);
        info!("[qc-06] Bascule attached");
        self.events.emit(MinterEvent::BasculeChanged { attached: true });
        Ok(())
    }

    pub fn detach_bascule(&self, caller: &Address) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.bascule = None;
        warn!("[qc-06] Bascule detached");
        self.events.emit(MinterEvent::BasculeChanged { attached: false });
        Ok(())
    }

    pub fn set_burn_commission(&self, caller: &Address, commission: u64) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Operator, caller)?;
        let old = std::mem::replace(&mut state.burn_commission, commission);
        self.events.emit(MinterEvent::BurnCommissionChanged {
            old,
            new: commission,
        });
        Ok(())
    }

    pub fn set_dust_fee_rate(&self, caller: &Address, rate: u64) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Operator, caller)?;
        let old = std::mem::replace(&mut state.dust_fee_rate, rate);
        self.events.emit(MinterEvent::DustFeeRateChanged { old, new: rate });
        Ok(())
    }

    pub fn set_maximum_fee(&self, caller: &Address, fee: u64) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Operator, caller)?;
        let old = std::mem::replace(&mut state.maximum_fee, fee);
        self.events.emit(MinterEvent::MaximumFeeChanged { old, new: fee });
        Ok(())
    }

    pub fn pause(&self, caller: &Address) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Pauser, caller)?;
        state.pause.pause()?;
        warn!("[qc-06] Minter paused");
        self.events.emit(MinterEvent::Paused { account: *caller });
        Ok(())
    }

    pub fn unpause(&self, caller: &Address) -> MinterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.pause.unpause()?;
        info!("[qc-06] Minter unpaused");
        self.events.emit(MinterEvent::Unpaused { account: *caller });
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_paused(&self) -> bool {
        self.state.read().pause.is_paused()
    }

    pub fn withdrawals_enabled(&self) -> bool {
        self.state.read().withdrawals_enabled
    }

    pub fn has_bascule(&self) -> bool {
        self.state.read().bascule.is_some()
    }

    pub fn burn_commission(&self) -> u64 {
        self.state.read().burn_commission
    }

    pub fn dust_fee_rate(&self) -> u64 {
        self.state.read().dust_fee_rate
    }

    pub fn maximum_fee(&self) -> u64 {
        self.state.read().maximum_fee
    }

    pub fn token(&self) -> TokenId {
        self.token
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn events(&self) -> &EventLog<MinterEvent> {
        &self.events
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Pause check plus a snapshot of the attached gate.
    fn gate(&self) -> MinterResult<Option<Arc<dyn WithdrawalGate>>> {
        let state = self.state.read();
        state.pause.ensure_not_paused()?;
        Ok(state.bascule.clone())
    }

    fn prepare(&self, payload: &[u8], proof: &[u8], kind: ActionKind) -> MinterResult<Prepared> {
        let verified = self.verifier.verify(payload, proof)?;
        let deposit = NotarizedDeposit::from_action(verified.action, kind)?;
        deposit.check(&self.chain_id, &self.token)?;
        debug!(
            %kind,
            amount = deposit.amount,
            payload_hash = %hex::encode(verified.payload_hash),
            "[qc-06] Deposit verified"
        );
        Ok(Prepared {
            deposit,
            payload_hash: verified.payload_hash,
            deposit_id: deposit_id(payload),
            fee: 0,
            user_signature: Vec::new(),
        })
    }

    fn with_fee(&self, mut item: Prepared, claim: &FeeClaim<'_>, now: u64) -> MinterResult<Prepared> {
        let approval =
            verify_fee_approval(claim.fee_payload, claim.user_signature, &item.deposit.recipient)?;
        let maximum_fee = self.state.read().maximum_fee;
        item.fee = charged_fee(&approval, maximum_fee, item.deposit.amount, now)?;
        item.user_signature = claim.user_signature.to_vec();
        Ok(item)
    }

    fn mint_single(&self, gate: Option<&dyn WithdrawalGate>, item: Prepared) -> MinterResult<MintReceipt> {
        let _commit = self.commit.lock();
        if self.replay.is_consumed(self.scope, &item.payload_hash) {
            return Err(ReplayError::PayloadAlreadyUsed {
                scope: self.scope,
                payload_hash: item.payload_hash,
            }
            .into());
        }
        let outcome = self.apply_all(gate, &[&item])?.into_iter().next().flatten();
        Ok(self.record(&item, outcome))
    }

    /// Apply `items` together or not at all. Caller holds `self.commit`.
    ///
    /// Gate and ledger are checked for every item before the hashes are
    /// consumed. A failure past that point can only come from a concurrent
    /// change to the gate or ledger; the hashes are then released.
    fn apply_all(
        &self,
        gate: Option<&dyn WithdrawalGate>,
        items: &[&Prepared],
    ) -> MinterResult<Vec<Option<WithdrawalOutcome>>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(gate) = gate {
            for item in items {
                gate.check_withdrawal(&self.scope.0, &item.deposit_id, item.deposit.amount)?;
            }
        }
        let credits = self.credits(items);
        self.ledger.check_mint(self.token, &credits)?;

        let hashes: Vec<Hash> = items.iter().map(|item| item.payload_hash).collect();
        self.replay.try_consume_all(self.scope, &hashes)?;

        let applied = self.withdraw_and_credit(gate, items, &credits);
        if let Err(e) = &applied {
            for hash in &hashes {
                self.replay.release(self.scope, hash);
            }
            error!(count = hashes.len(), error = %e, "[qc-06] Mint failed after consumption, released");
        }
        applied
    }

    fn withdraw_and_credit(
        &self,
        gate: Option<&dyn WithdrawalGate>,
        items: &[&Prepared],
        credits: &[(Address, u64)],
    ) -> MinterResult<Vec<Option<WithdrawalOutcome>>> {
        let outcomes = items
            .iter()
            .map(|item| match gate {
                Some(gate) => gate
                    .validate_withdrawal(&self.scope.0, item.deposit_id, item.deposit.amount)
                    .map(Some),
                None => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.ledger.mint_all(self.token, credits)?;
        Ok(outcomes)
    }

    /// Recipient and treasury credits, in item order.
    fn credits(&self, items: &[&Prepared]) -> Vec<(Address, u64)> {
        let mut credits = Vec::with_capacity(items.len() * 2);
        for item in items {
            credits.push((item.deposit.recipient, item.deposit.amount - item.fee));
            if item.fee > 0 {
                credits.push((self.treasury, item.fee));
            }
        }
        credits
    }

    /// Events and receipt for an applied item.
    fn record(&self, item: &Prepared, bascule: Option<WithdrawalOutcome>) -> MintReceipt {
        let deposit = &item.deposit;
        let net = deposit.amount - item.fee;
        if item.fee > 0 {
            self.events.emit(MinterEvent::FeeCharged {
                payload_hash: item.payload_hash,
                fee: item.fee,
                user_signature: item.user_signature.clone(),
            });
        }

        info!(
            amount = net,
            fee = item.fee,
            payload_hash = %hex::encode(item.payload_hash),
            deposit_id = %hex::encode(item.deposit_id),
            "[qc-06] Mint proof consumed"
        );
        self.events.emit(MinterEvent::MintProofConsumed {
            recipient: deposit.recipient,
            payload_hash: item.payload_hash,
            amount: net,
        });
        MintReceipt {
            payload_hash: item.payload_hash,
            deposit_id: item.deposit_id,
            recipient: deposit.recipient,
            amount: net,
            fee: item.fee,
            bascule,
        }
    }
}

fn ensure_equal_length(payloads: usize, other: usize) -> MinterResult<()> {
    if payloads != other {
        return Err(MinterError::NonEqualLength { payloads, other });
    }
    Ok(())
}

impl DepositSink for DepositMinter {
    fn deposit(&self, kind: ActionKind, payload: &[u8], proof: &[u8]) -> MinterResult<MintReceipt> {
        match kind {
            ActionKind::DepositV1 => self.mint_v1(payload, proof),
            _ => self.mint(payload, proof),
        }
    }
}
