//! # Deployment Fixtures
//!
//! A wired custody deployment backed by an in-process notary committee.

use std::sync::Arc;

use custody_runtime::{CustodyConfig, CustodyContainer, Dispatcher};
use qc_01_action_codec::{deposit_id, encode, DepositV0, DepositV1};
use qc_02_consortium::testing::NotaryCommittee;
use qc_04_bascule::Bascule;
use shared_crypto::{eth_signed_message_hash, Secp256k1KeyPair};
use shared_types::{Address, ChainId, Hash, Role, TokenId};

/// Deposit recipient used throughout the suite.
pub const ALICE: Address = [0xA1; 20];
/// Second user.
pub const BOB: Address = [0xB0; 20];
/// Account granted `DepositReporter` on the Bascule.
pub const REPORTER: Address = [0x4E; 20];

/// Wired deployment plus the keys that drive it.
pub struct Deployment {
    pub committee: NotaryCommittee,
    pub report_signer: Secp256k1KeyPair,
    pub container: Arc<CustodyContainer>,
}

impl Deployment {
    /// Equal-weight committee of `size`, no Bascule.
    pub fn new(size: usize) -> Self {
        Self::build(&vec![1; size], None)
    }

    /// Committee of `[1, 1, 1]` plus a Bascule at `validate_threshold`.
    pub fn with_bascule(validate_threshold: u64) -> Self {
        Self::build(&[1, 1, 1], Some(validate_threshold))
    }

    pub fn build(weights: &[u64], bascule_threshold: Option<u64>) -> Self {
        let committee = NotaryCommittee::new(weights);
        let report_signer = Secp256k1KeyPair::generate();

        let mut config = CustodyConfig::default();
        config.consortium.initial_valset = Some(committee.validator_set_payload(0, 1));
        config.minter.withdrawals_enabled = true;
        if let Some(threshold) = bascule_threshold {
            config.bascule.enabled = true;
            config.bascule.validate_threshold = threshold;
            config.bascule.trusted_signer = Some(report_signer.address());
        }

        let container = Arc::new(CustodyContainer::new(config).expect("deployment wiring"));
        if let Some(bascule) = &container.bascule {
            bascule
                .grant_role(&container.config.identity.admin, Role::DepositReporter, REPORTER)
                .expect("grant reporter");
        }
        Self {
            committee,
            report_signer,
            container,
        }
    }

    pub fn admin(&self) -> Address {
        self.container.config.identity.admin
    }

    pub fn chain(&self) -> ChainId {
        self.container.config.identity.chain_id
    }

    pub fn token(&self) -> TokenId {
        self.container.config.identity.token
    }

    pub fn treasury(&self) -> Address {
        self.container.config.identity.treasury
    }

    pub fn bascule(&self) -> &Bascule {
        self.container.bascule.as_deref().expect("bascule enabled")
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.container.clone())
    }

    /// Encoded `DepositV0` to this chain.
    pub fn deposit_v0(&self, recipient: Address, amount: u64, vout: u32) -> Vec<u8> {
        encode(&DepositV0 {
            to_chain: self.chain(),
            recipient,
            amount,
            txid: [0x7A; 32],
            vout,
        })
    }

    /// Encoded `DepositV1` naming this deployment's token.
    pub fn deposit_v1(&self, recipient: Address, amount: u64, vout: u32) -> Vec<u8> {
        encode(&DepositV1 {
            to_chain: self.chain(),
            recipient,
            amount,
            txid: [0x7B; 32],
            vout,
            token: self.token(),
        })
    }

    /// Full-committee proof over `payload`.
    pub fn notarize(&self, payload: &[u8]) -> Vec<u8> {
        self.committee.sign(payload)
    }

    /// Trusted-signer report proof for the deposit carried by `payload`.
    pub fn report_proof(&self, payload: &[u8]) -> (Hash, Vec<u8>) {
        let id = deposit_id(payload);
        let signature = self
            .report_signer
            .sign_prehash(&eth_signed_message_hash(&id))
            .expect("report signing");
        (id, signature.to_vec())
    }
}
