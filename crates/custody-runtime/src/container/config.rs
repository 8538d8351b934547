//! # Custody Configuration
//!
//! Unified configuration for every component plus runtime identities.
//!
//! ## Security Requirements
//!
//! - The Bascule trusted signer MUST be set explicitly when the Bascule is
//!   enabled. The zero address is accepted only when written out, and
//!   disables per-deposit report signatures.
//! - The admin account MUST NOT be the zero address.

use qc_05_asset_router::DEFAULT_DUST_FEE_RATE;
use qc_telemetry::TelemetryConfig;
use shared_types::{Address, ChainId, TokenId, ZERO_ADDRESS};
use std::env;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct CustodyConfig {
    /// Accounts and chain identity.
    pub identity: IdentityConfig,
    /// Consortium configuration.
    pub consortium: ConsortiumSection,
    /// Bascule configuration.
    pub bascule: BasculeSection,
    /// Deposit minter configuration.
    pub minter: MinterSection,
    /// Staking router configuration.
    pub router: RouterSection,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

/// Chain and account identities.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Chain this deployment serves.
    pub chain_id: ChainId,
    /// Holds the admin role everywhere.
    pub admin: Address,
    /// Replay scope and Bascule validator account of the minter.
    pub minter_address: Address,
    /// Replay scope of the router.
    pub router_address: Address,
    /// Account the runtime submits Bascule reports as.
    pub reporter_address: Address,
    /// Receives fees and commissions.
    pub treasury: Address,
    /// Token issued by the minter.
    pub token: TokenId,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::evm(1),
            admin: [0xAD; 20],
            minter_address: [0x06; 20],
            router_address: [0x05; 20],
            reporter_address: [0x04; 20],
            treasury: [0x7E; 20],
            token: TokenId::from_address([0x0B; 20]),
        }
    }
}

/// Consortium configuration.
#[derive(Debug, Clone)]
pub struct ConsortiumSection {
    /// Upper bound on validators per set.
    pub max_validators: usize,
    /// Unsigned `NewValidatorSet` payload installed at startup.
    pub initial_valset: Option<Vec<u8>>,
}

impl Default for ConsortiumSection {
    fn default() -> Self {
        Self {
            max_validators: 102,
            initial_valset: None,
        }
    }
}

/// Bascule configuration.
#[derive(Debug, Clone)]
pub struct BasculeSection {
    /// Attach a Bascule to the minter.
    pub enabled: bool,
    /// Upper bound on deposits per report.
    pub max_deposits: usize,
    /// Withdrawals at or above this amount must be reported.
    pub validate_threshold: u64,
    /// `None` until configured explicitly.
    pub trusted_signer: Option<Address>,
}

impl Default for BasculeSection {
    fn default() -> Self {
        Self {
            enabled: false,
            max_deposits: 100,
            validate_threshold: 0,
            trusted_signer: None,
        }
    }
}

/// Deposit minter configuration.
#[derive(Debug, Clone)]
pub struct MinterSection {
    /// Flat redeem commission.
    pub burn_commission: u64,
    /// sat/kvB for the dust limit.
    pub dust_fee_rate: u64,
    /// Cap on claimer fees.
    pub maximum_fee: u64,
    /// Redeem availability at startup.
    pub withdrawals_enabled: bool,
}

impl Default for MinterSection {
    fn default() -> Self {
        Self {
            burn_commission: 0,
            dust_fee_rate: DEFAULT_DUST_FEE_RATE,
            maximum_fee: 0,
            withdrawals_enabled: false,
        }
    }
}

/// Staking router configuration.
#[derive(Debug, Clone)]
pub struct RouterSection {
    /// Destination of native redeems.
    pub bitcoin_chain: ChainId,
    /// Flat native-redeem commission.
    pub burn_commission: u64,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            bitcoin_chain: ChainId::BITCOIN_MAINNET,
            burn_commission: 0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment value could not be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    /// Bascule enabled without an explicit trusted signer.
    #[error("Bascule enabled but QC_BASCULE_TRUSTED_SIGNER is not set")]
    MissingTrustedSigner,

    #[error("Admin account is the zero address")]
    ZeroAdmin,

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

impl CustodyConfig {
    /// Defaults overridden from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `QC_CHAIN_ID`: EVM chain id (decimal) or 32-byte hex
    /// - `QC_ADMIN`, `QC_TREASURY`, `QC_MINTER_ADDRESS`, `QC_ROUTER_ADDRESS`,
    ///   `QC_REPORTER_ADDRESS`: 20-byte hex
    /// - `QC_TOKEN`: 32-byte hex
    /// - `QC_MAX_VALIDATORS`, `QC_INITIAL_VALSET` (hex payload)
    /// - `QC_BASCULE_ENABLED`, `QC_BASCULE_MAX_DEPOSITS`,
    ///   `QC_BASCULE_VALIDATE_THRESHOLD`, `QC_BASCULE_TRUSTED_SIGNER`
    /// - `QC_BURN_COMMISSION`, `QC_DUST_FEE_RATE`, `QC_MAXIMUM_FEE`,
    ///   `QC_WITHDRAWALS_ENABLED`
    /// - `QC_ROUTER_BURN_COMMISSION`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with an injectable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = CustodyConfig {
            telemetry: TelemetryConfig::from_env(),
            ..CustodyConfig::default()
        };
        let get = |var: &'static str| lookup(var).map(|v| (var, v));

        if let Some((var, v)) = get("QC_CHAIN_ID") {
            config.identity.chain_id = parse_chain_id(var, &v)?;
        }
        if let Some((var, v)) = get("QC_ADMIN") {
            config.identity.admin = parse_address(var, &v)?;
        }
        if let Some((var, v)) = get("QC_TREASURY") {
            config.identity.treasury = parse_address(var, &v)?;
        }
        if let Some((var, v)) = get("QC_MINTER_ADDRESS") {
            config.identity.minter_address = parse_address(var, &v)?;
        }
        if let Some((var, v)) = get("QC_ROUTER_ADDRESS") {
            config.identity.router_address = parse_address(var, &v)?;
        }
        if let Some((var, v)) = get("QC_REPORTER_ADDRESS") {
            config.identity.reporter_address = parse_address(var, &v)?;
        }
        if let Some((var, v)) = get("QC_TOKEN") {
            config.identity.token = TokenId(parse_fixed::<32>(var, &v)?);
        }

        if let Some((var, v)) = get("QC_MAX_VALIDATORS") {
            config.consortium.max_validators = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_INITIAL_VALSET") {
            config.consortium.initial_valset = Some(parse_hex(var, &v)?);
        }

        if let Some((var, v)) = get("QC_BASCULE_ENABLED") {
            config.bascule.enabled = parse_bool(var, &v)?;
        }
        if let Some((var, v)) = get("QC_BASCULE_MAX_DEPOSITS") {
            config.bascule.max_deposits = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_BASCULE_VALIDATE_THRESHOLD") {
            config.bascule.validate_threshold = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_BASCULE_TRUSTED_SIGNER") {
            config.bascule.trusted_signer = Some(parse_address(var, &v)?);
        }

        if let Some((var, v)) = get("QC_BURN_COMMISSION") {
            config.minter.burn_commission = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_DUST_FEE_RATE") {
            config.minter.dust_fee_rate = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_MAXIMUM_FEE") {
            config.minter.maximum_fee = parse_number(var, &v)?;
        }
        if let Some((var, v)) = get("QC_WITHDRAWALS_ENABLED") {
            config.minter.withdrawals_enabled = parse_bool(var, &v)?;
        }
        if let Some((var, v)) = get("QC_ROUTER_BURN_COMMISSION") {
            config.router.burn_commission = parse_number(var, &v)?;
        }

        Ok(config)
    }

    /// Reject configurations that must never start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.admin == ZERO_ADDRESS {
            return Err(ConfigError::ZeroAdmin);
        }
        if self.consortium.max_validators == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_validators",
            });
        }
        if self.minter.dust_fee_rate == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "dust_fee_rate",
            });
        }
        if self.bascule.enabled {
            if self.bascule.max_deposits == 0 {
                return Err(ConfigError::ZeroLimit {
                    field: "max_deposits",
                });
            }
            if self.bascule.trusted_signer.is_none() {
                return Err(ConfigError::MissingTrustedSigner);
            }
        }
        Ok(())
    }
}

fn strip_0x(value: &str) -> &str {
    value.strip_prefix("0x").unwrap_or(value)
}

fn parse_hex(var: &'static str, value: &str) -> Result<Vec<u8>, ConfigError> {
    hex::decode(strip_0x(value.trim())).map_err(|e| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}

fn parse_fixed<const N: usize>(var: &'static str, value: &str) -> Result<[u8; N], ConfigError> {
    let bytes = parse_hex(var, value)?;
    bytes.try_into().map_err(|b: Vec<u8>| ConfigError::InvalidValue {
        var,
        reason: format!("expected {N} bytes, got {}", b.len()),
    })
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    parse_fixed::<20>(var, value)
}

fn parse_chain_id(var: &'static str, value: &str) -> Result<ChainId, ConfigError> {
    let value = value.trim();
    if value.starts_with("0x") {
        return parse_fixed::<32>(var, value).map(ChainId);
    }
    parse_number::<u64>(var, value).map(ChainId::evm)
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            var,
            reason: format!("not a boolean: {other}"),
        }),
    }
}
