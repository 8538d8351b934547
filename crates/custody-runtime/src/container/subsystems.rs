//! # Custody Container
//!
//! Holds every component instance and wires them in dependency order:
//!
//! ```text
//! Level 0: Replay ledger, token ledger (no dependencies)
//! Level 1: Consortium (bootstrapped from the initial validator set)
//! Level 2: Bascule (optional)
//! Level 3: Deposit minter, staking router (verify through the consortium)
//! ```
//!
//! The minter and router consume payloads under distinct replay scopes, so
//! one notarized payload can be honoured once by each of them.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use qc_02_consortium::{Consortium, ConsortiumConfig, ConsortiumError};
use qc_03_replay_ledger::{InMemoryReplayLedger, ScopeId};
use qc_04_bascule::{Bascule, BasculeConfig, BasculeError};
use qc_05_asset_router::{RouterConfig, StakingRouter};
use qc_06_deposit_minter::{DepositMinter, MinterConfig, MinterError};
use shared_types::{InMemoryTokenLedger, Role, ZERO_ADDRESS};

use crate::container::config::CustodyConfig;

/// Wiring failures.
#[derive(Debug, Error)]
pub enum WiringError {
    #[error("consortium bootstrap failed: {0}")]
    Consortium(#[from] ConsortiumError),

    #[error("bascule setup failed: {0}")]
    Bascule(#[from] BasculeError),

    #[error("minter setup failed: {0}")]
    Minter(#[from] MinterError),

    /// Enabled Bascule reached wiring without a signer
    #[error("bascule trusted signer not configured")]
    MissingTrustedSigner,
}

/// All components, shared behind `Arc`.
pub struct CustodyContainer {
    pub config: CustodyConfig,
    pub replay: Arc<InMemoryReplayLedger>,
    pub ledger: Arc<InMemoryTokenLedger>,
    pub consortium: Arc<Consortium>,
    pub bascule: Option<Arc<Bascule>>,
    pub minter: Arc<DepositMinter>,
    pub router: Arc<StakingRouter>,
}

impl CustodyContainer {
    /// Build and wire every component.
    pub fn new(config: CustodyConfig) -> Result<Self, WiringError> {
        let identity = config.identity.clone();
        let admin = identity.admin;

        info!("[runtime] Initializing Level 0: ledgers");
        let replay = Arc::new(InMemoryReplayLedger::new());
        let ledger = Arc::new(InMemoryTokenLedger::new());

        info!("[runtime] Initializing Level 1: consortium");
        let consortium = Arc::new(Consortium::new(
            ConsortiumConfig {
                max_validators: config.consortium.max_validators,
            },
            admin,
        ));
        match &config.consortium.initial_valset {
            Some(payload) => {
                let epoch = consortium.initialize_from_payload(&admin, payload)?;
                info!(epoch, "[runtime] Initial validator set installed");
            }
            None => warn!("[runtime] No initial validator set; proofs will fail until one is installed"),
        }

        let bascule = if config.bascule.enabled {
            info!("[runtime] Initializing Level 2: bascule");
            let trusted_signer = config
                .bascule
                .trusted_signer
                .ok_or(WiringError::MissingTrustedSigner)?;
            if trusted_signer == ZERO_ADDRESS {
                warn!("[runtime] Bascule trusted signer is zero; report signatures are not checked");
            }
            let bascule = Arc::new(Bascule::new(
                BasculeConfig {
                    max_deposits: config.bascule.max_deposits,
                    validate_threshold: config.bascule.validate_threshold,
                    trusted_signer,
                },
                admin,
            ));
            bascule.grant_role(&admin, Role::WithdrawalValidator, identity.minter_address)?;
            bascule.grant_role(&admin, Role::DepositReporter, identity.reporter_address)?;
            Some(bascule)
        } else {
            None
        };

        info!("[runtime] Initializing Level 3: minter and router");
        let minter = Arc::new(DepositMinter::new(
            MinterConfig {
                chain_id: identity.chain_id,
                token: identity.token,
                treasury: identity.treasury,
                burn_commission: config.minter.burn_commission,
                dust_fee_rate: config.minter.dust_fee_rate,
                maximum_fee: config.minter.maximum_fee,
                withdrawals_enabled: config.minter.withdrawals_enabled,
            },
            admin,
            ScopeId(identity.minter_address),
            consortium.clone(),
            replay.clone(),
            ledger.clone(),
        ));
        if let Some(gate) = &bascule {
            minter.attach_bascule(&admin, gate.clone())?;
        }

        let router = Arc::new(StakingRouter::new(
            RouterConfig {
                chain_id: identity.chain_id,
                bitcoin_chain: config.router.bitcoin_chain,
                treasury: identity.treasury,
                burn_commission: config.router.burn_commission,
                dust_fee_rate: config.minter.dust_fee_rate,
            },
            admin,
            ScopeId(identity.router_address),
            consortium.clone(),
            replay.clone(),
            ledger.clone(),
        ));

        info!(
            chain = %identity.chain_id,
            bascule = bascule.is_some(),
            "[runtime] Custody container ready"
        );

        Ok(Self {
            config,
            replay,
            ledger,
            consortium,
            bascule,
            minter,
            router,
        })
    }
}
