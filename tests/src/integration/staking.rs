//! # Staking Round Trip
//!
//! Chain A burns and emits a `StakingOperationRequest`; the notaries attest
//! a matching `StakingReceipt`; chain B verifies it and mints.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fixtures::{Deployment, ALICE, BOB};
    use qc_01_action_codec::{decode, encode, StakingOperationRequest, StakingReceipt};
    use qc_02_consortium::{Consortium, ConsortiumConfig};
    use qc_03_replay_ledger::{InMemoryReplayLedger, ReplayError, ScopeId};
    use qc_05_asset_router::{RouterConfig, RouterError, StakingRouter};
    use shared_types::{ChainId, InMemoryTokenLedger, TokenId, TokenLedger};

    const CHAIN_B: ChainId = ChainId::evm(8453);
    const TOKEN_A: TokenId = TokenId([0xAA; 32]);
    const TOKEN_B: TokenId = TokenId([0xBB; 32]);

    struct RemoteChain {
        router: StakingRouter,
        ledger: Arc<InMemoryTokenLedger>,
    }

    /// Chain B, notarized by the same committee as `d`.
    fn remote(d: &Deployment) -> RemoteChain {
        let admin = d.admin();
        let consortium = Arc::new(Consortium::new(ConsortiumConfig::default(), admin));
        consortium
            .initialize_validator_set(&admin, &d.committee.validator_set_action(0, 1))
            .unwrap();
        let ledger = Arc::new(InMemoryTokenLedger::new());
        let router = StakingRouter::new(
            RouterConfig {
                chain_id: CHAIN_B,
                ..RouterConfig::default()
            },
            admin,
            ScopeId([0xB5; 20]),
            consortium,
            Arc::new(InMemoryReplayLedger::new()),
            ledger.clone(),
        );
        router
            .set_route(&admin, TOKEN_A, d.chain(), TOKEN_B, CHAIN_B)
            .unwrap();
        RemoteChain { router, ledger }
    }

    /// What the notaries attest after observing `request` on chain A.
    fn receipt_for(request_payload: &[u8], request: &StakingOperationRequest) -> Vec<u8> {
        encode(&StakingReceipt {
            request_hash: qc_01_action_codec::payload_hash(request_payload),
            recipient: request.recipient,
            amount: request.amount,
            from_token: request.from_token,
            to_token: request.to_token,
            chain: request.to_chain,
        })
    }

    #[test]
    fn test_request_and_receipt_round_trip() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let router_a = &d.container.router;
        router_a
            .set_route(&admin, TOKEN_A, d.chain(), TOKEN_B, CHAIN_B)
            .unwrap();
        d.container.ledger.mint(TOKEN_A, ALICE, 1_000).unwrap();
        let chain_b = remote(&d);

        let issued = router_a.start_staking(&ALICE, BOB, 400, TOKEN_A, CHAIN_B).unwrap();
        assert_eq!(issued.nonce, 0);
        assert_eq!(d.container.ledger.balance_of(TOKEN_A, &ALICE), 600);

        let request: StakingOperationRequest = decode(&issued.payload).unwrap();
        assert_eq!(request.from_chain, d.chain());
        assert_eq!(request.to_token, TOKEN_B);

        let receipt = receipt_for(&issued.payload, &request);
        let proof = d.notarize(&receipt);
        let finalized = chain_b.router.finalize_staking(&receipt, &proof).unwrap();
        assert_eq!(finalized.receipt.request_hash, issued.payload_hash);
        assert_eq!(chain_b.ledger.balance_of(TOKEN_B, &BOB), 400);

        assert!(matches!(
            chain_b.router.finalize_staking(&receipt, &proof),
            Err(RouterError::Replay(ReplayError::PayloadAlreadyUsed { .. }))
        ));
        assert_eq!(chain_b.ledger.balance_of(TOKEN_B, &BOB), 400);
    }

    #[test]
    fn test_receipt_for_other_chain_rejected() {
        let d = Deployment::new(3);
        let chain_b = remote(&d);
        let receipt = encode(&StakingReceipt {
            request_hash: [0x01; 32],
            recipient: BOB,
            amount: 10,
            from_token: TOKEN_A,
            to_token: TOKEN_B,
            chain: ChainId::evm(10),
        });
        assert!(matches!(
            chain_b.router.finalize_staking(&receipt, &d.notarize(&receipt)),
            Err(RouterError::WrongChain { .. })
        ));
    }

    #[test]
    fn test_nonces_increase_and_unrouted_requests_fail() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let router = &d.container.router;
        router
            .set_route(&admin, TOKEN_A, d.chain(), TOKEN_B, CHAIN_B)
            .unwrap();
        d.container.ledger.mint(TOKEN_A, ALICE, 100).unwrap();

        let first = router.start_staking(&ALICE, BOB, 10, TOKEN_A, CHAIN_B).unwrap();
        let second = router.start_staking(&ALICE, BOB, 10, TOKEN_A, CHAIN_B).unwrap();
        assert_eq!((first.nonce, second.nonce), (0, 1));
        assert_ne!(first.payload_hash, second.payload_hash);

        assert!(matches!(
            router.start_staking(&ALICE, BOB, 10, TOKEN_B, CHAIN_B),
            Err(RouterError::StakingNotAllowed { .. })
        ));
        assert!(matches!(
            router.start_staking(&ALICE, BOB, 1_000, TOKEN_A, CHAIN_B),
            Err(RouterError::Ledger(_))
        ));
        assert_eq!(d.container.ledger.balance_of(TOKEN_A, &ALICE), 80);
    }
}
