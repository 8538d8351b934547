//! Staking Router Service
//!
//! Origin side: burn and emit a `StakingOperationRequest` for the notaries.
//! Destination side: verify the notarized `StakingReceipt`, consume it once
//! in the router scope and mint the routed token.

use crate::domain::bitcoin::{calc_unstake_request_amount, UnstakeAmount, DEFAULT_DUST_FEE_RATE};
use crate::domain::errors::{RouterError, RouterResult};
use crate::domain::routes::{Route, RouteTable};
use crate::events::RouterEvent;
use crate::ports::inbound::RouteResolver;
use parking_lot::RwLock;
use qc_01_action_codec::{
    encode, payload_hash, Action, ActionKind, CodecError, RedeemFromNativeToken,
    StakingOperationRequest, StakingReceipt,
};
use qc_02_consortium::PayloadVerifier;
use qc_03_replay_ledger::{ReplayLedger, ScopeId};
use shared_types::{
    AccessControl, Address, ChainId, EventLog, Hash, Role, TokenId, TokenLedger, ZERO_ADDRESS,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Named token redeemed by [`StakingRouter::redeem_native`].
pub const NATIVE_TOKEN_NAME: &str = "native";

/// Router configuration
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Chain this router runs on
    pub chain_id: ChainId,
    /// Destination chain for native redeems
    pub bitcoin_chain: ChainId,
    /// Receives redeem commissions
    pub treasury: Address,
    /// Flat commission deducted from native redeems
    pub burn_commission: u64,
    /// sat/kvB used for the dust limit
    pub dust_fee_rate: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::evm(1),
            bitcoin_chain: ChainId::BITCOIN_MAINNET,
            treasury: ZERO_ADDRESS,
            burn_commission: 0,
            dust_fee_rate: DEFAULT_DUST_FEE_RATE,
        }
    }
}

/// Result of [`StakingRouter::start_staking`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakingRequestIssued {
    pub nonce: u64,
    pub payload: Vec<u8>,
    pub payload_hash: Hash,
}

/// Result of [`StakingRouter::finalize_staking`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakingFinalized {
    pub receipt: StakingReceipt,
    pub payload_hash: Hash,
}

/// Result of [`StakingRouter::redeem_native`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeRedeemIssued {
    pub payload: Vec<u8>,
    pub payload_hash: Hash,
    pub amount_after_fee: u64,
    pub commission: u64,
}

struct RouterState {
    routes: RouteTable,
    access: AccessControl,
    next_nonce: u64,
    burn_commission: u64,
    dust_fee_rate: u64,
}

pub struct StakingRouter {
    chain_id: ChainId,
    bitcoin_chain: ChainId,
    treasury: Address,
    scope: ScopeId,
    state: RwLock<RouterState>,
    verifier: Arc<dyn PayloadVerifier>,
    replay: Arc<dyn ReplayLedger>,
    ledger: Arc<dyn TokenLedger>,
    events: EventLog<RouterEvent>,
}

impl StakingRouter {
    pub fn new(
        config: RouterConfig,
        admin: Address,
        scope: ScopeId,
        verifier: Arc<dyn PayloadVerifier>,
        replay: Arc<dyn ReplayLedger>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self {
            chain_id: config.chain_id,
            bitcoin_chain: config.bitcoin_chain,
            treasury: config.treasury,
            scope,
            state: RwLock::new(RouterState {
                routes: RouteTable::new(),
                access: AccessControl::with_admin(admin),
                next_nonce: 0,
                burn_commission: config.burn_commission,
                dust_fee_rate: config.dust_fee_rate,
            }),
            verifier,
            replay,
            ledger,
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    pub fn grant_role(&self, caller: &Address, role: Role, account: Address) -> RouterResult<bool> {
        Ok(self.state.write().access.grant_as(caller, role, account)?)
    }

    pub fn revoke_role(&self, caller: &Address, role: Role, account: Address) -> RouterResult<bool> {
        Ok(self.state.write().access.revoke_as(caller, role, account)?)
    }

    pub fn set_route(
        &self,
        caller: &Address,
        from_token: TokenId,
        from_chain: ChainId,
        to_token: TokenId,
        to_chain: ChainId,
    ) -> RouterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.routes.set_route(Route {
            from_token,
            from_chain,
            to_token,
            to_chain,
        });
        info!(%from_token, %from_chain, %to_token, %to_chain, "[qc-05] Route set");
        self.events.emit(RouterEvent::RouteSet {
            from_token,
            from_chain,
            to_token,
            to_chain,
        });
        Ok(())
    }

    /// Returns whether a route was present.
    pub fn remove_route(
        &self,
        caller: &Address,
        from_token: &TokenId,
        to_chain: &ChainId,
    ) -> RouterResult<bool> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        let removed = state.routes.remove_route(from_token, to_chain).is_some();
        if removed {
            info!(%from_token, %to_chain, "[qc-05] Route removed");
            self.events.emit(RouterEvent::RouteRemoved {
                from_token: *from_token,
                to_chain: *to_chain,
            });
        }
        Ok(removed)
    }

    pub fn set_named_token(&self, caller: &Address, name: &str, token: TokenId) -> RouterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Admin, caller)?;
        state.routes.set_named_token(name, token);
        info!(token_name = name, %token, "[qc-05] Named token set");
        self.events.emit(RouterEvent::NamedTokenSet {
            name: name.to_string(),
            token,
        });
        Ok(())
    }

    pub fn named_token(&self, name: &str) -> Option<TokenId> {
        self.state.read().routes.named_token(name)
    }

    pub fn set_burn_commission(&self, caller: &Address, commission: u64) -> RouterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Operator, caller)?;
        let old = std::mem::replace(&mut state.burn_commission, commission);
        self.events.emit(RouterEvent::CommissionUpdated {
            old,
            new: commission,
        });
        Ok(())
    }

    pub fn set_dust_fee_rate(&self, caller: &Address, rate: u64) -> RouterResult<()> {
        let mut state = self.state.write();
        state.access.ensure(Role::Operator, caller)?;
        let old = std::mem::replace(&mut state.dust_fee_rate, rate);
        self.events.emit(RouterEvent::DustFeeRateUpdated { old, new: rate });
        Ok(())
    }

    // =========================================================================
    // STAKING FLOW
    // =========================================================================

    /// Burn `amount` of `from_token` from `caller` and issue a request for
    /// the notaries to relay to `to_chain`.
    pub fn start_staking(
        &self,
        caller: &Address,
        recipient: Address,
        amount: u64,
        from_token: TokenId,
        to_chain: ChainId,
    ) -> RouterResult<StakingRequestIssued> {
        if amount == 0 {
            return Err(RouterError::ZeroAmount);
        }
        let mut state = self.state.write();
        let to_token = state
            .routes
            .get_route(&from_token, &to_chain)
            .ok_or(RouterError::StakingNotAllowed {
                from_token,
                to_chain,
            })?;

        self.ledger.burn(from_token, *caller, amount)?;

        let nonce = state.next_nonce;
        state.next_nonce += 1;

        let payload = encode(&StakingOperationRequest {
            nonce,
            recipient,
            amount,
            from_token,
            to_token,
            from_chain: self.chain_id,
            to_chain,
        });
        let payload_hash = payload_hash(&payload);
        info!(
            nonce,
            amount,
            %to_chain,
            payload_hash = %hex::encode(payload_hash),
            "[qc-05] Staking operation requested"
        );
        self.events.emit(RouterEvent::StakingOperationRequested {
            nonce,
            payload_hash,
            payload: payload.clone(),
        });
        Ok(StakingRequestIssued {
            nonce,
            payload,
            payload_hash,
        })
    }

    /// Honour a notarized receipt addressed to this chain.
    pub fn finalize_staking(&self, payload: &[u8], proof: &[u8]) -> RouterResult<StakingFinalized> {
        let verified = self.verifier.verify(payload, proof)?;
        let receipt = match verified.action {
            Action::StakingReceipt(receipt) => receipt,
            other => {
                return Err(CodecError::InvalidAction {
                    expected: ActionKind::StakingReceipt,
                    actual: other.kind(),
                }
                .into())
            }
        };

        if receipt.chain != self.chain_id {
            warn!(expected = %self.chain_id, actual = %receipt.chain, "[qc-05] Receipt for another chain");
            return Err(RouterError::WrongChain {
                expected: self.chain_id,
                actual: receipt.chain,
            });
        }

        let routed = self.state.read().routes.get_route(&receipt.from_token, &receipt.chain);
        if routed != Some(receipt.to_token) {
            return Err(RouterError::StakingNotAllowed {
                from_token: receipt.from_token,
                to_chain: receipt.chain,
            });
        }

        let credit = [(receipt.recipient, receipt.amount)];
        self.ledger.check_mint(receipt.to_token, &credit)?;
        self.replay
            .try_consume(self.scope, verified.payload_hash)
            .into_result(self.scope, verified.payload_hash)?;
        if let Err(e) = self.ledger.mint_all(receipt.to_token, &credit) {
            self.replay.release(self.scope, &verified.payload_hash);
            error!(
                payload_hash = %hex::encode(verified.payload_hash),
                error = %e,
                "[qc-05] Receipt credit failed after consumption, released"
            );
            return Err(e.into());
        }

        info!(
            request_hash = %hex::encode(receipt.request_hash),
            amount = receipt.amount,
            payload_hash = %hex::encode(verified.payload_hash),
            "[qc-05] Staking operation finalized"
        );
        self.events.emit(RouterEvent::StakingOperationFinalized {
            request_hash: receipt.request_hash,
            recipient: receipt.recipient,
            token: receipt.to_token,
            amount: receipt.amount,
        });
        Ok(StakingFinalized {
            receipt,
            payload_hash: verified.payload_hash,
        })
    }

    /// Burn the native token and issue a redeem to a Bitcoin script.
    pub fn redeem_native(
        &self,
        caller: &Address,
        script_pubkey: &[u8],
        amount: u64,
    ) -> RouterResult<NativeRedeemIssued> {
        let state = self.state.read();
        let native = state
            .routes
            .named_token(NATIVE_TOKEN_NAME)
            .ok_or_else(|| RouterError::UnknownNamedToken {
                name: NATIVE_TOKEN_NAME.to_string(),
            })?;
        if state.routes.get_route(&native, &self.bitcoin_chain).is_none() {
            return Err(RouterError::StakingNotAllowed {
                from_token: native,
                to_chain: self.bitcoin_chain,
            });
        }

        let commission = state.burn_commission;
        let unstake =
            calc_unstake_request_amount(script_pubkey, amount, commission, state.dust_fee_rate)?;
        let amount_after_fee = unstake.ensure_redeemable(amount, commission)?;
        drop(state);

        self.ledger.burn(native, *caller, amount)?;
        if commission > 0 {
            self.ledger.mint(native, self.treasury, commission)?;
        }

        let payload = encode(&RedeemFromNativeToken {
            recipient: *caller,
            script_pubkey: script_pubkey.to_vec(),
            amount: amount_after_fee,
        });
        let payload_hash = payload_hash(&payload);
        info!(
            amount,
            amount_after_fee,
            payload_hash = %hex::encode(payload_hash),
            "[qc-05] Native redeem requested"
        );
        self.events.emit(RouterEvent::NativeRedeemRequested {
            payload_hash,
            payload: payload.clone(),
            amount_after_fee,
        });
        Ok(NativeRedeemIssued {
            payload,
            payload_hash,
            amount_after_fee,
            commission,
        })
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn events(&self) -> &EventLog<RouterEvent> {
        &self.events
    }
}

impl RouteResolver for StakingRouter {
    fn get_route(&self, from_token: &TokenId, to_chain: &ChainId) -> Option<TokenId> {
        self.state.read().routes.get_route(from_token, to_chain)
    }

    fn calc_unstake_request_amount(&self, script: &[u8], amount: u64) -> RouterResult<UnstakeAmount> {
        let state = self.state.read();
        let result =
            calc_unstake_request_amount(script, amount, state.burn_commission, state.dust_fee_rate)?;
        debug!(
            amount,
            amount_after_fee = result.amount_after_fee,
            is_above_dust = result.is_above_dust,
            "[qc-05] Unstake amount computed"
        );
        Ok(result)
    }
}
