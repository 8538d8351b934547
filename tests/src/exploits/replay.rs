//! # Replay Attacks
//!
//! A relayer resubmitting an honoured payload, directly, inside a batch,
//! or wrapped in a malleated proof.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE};
    use qc_01_action_codec::payload_hash;
    use qc_02_consortium::{ConsortiumError, ProofSlot, SignatureProof};
    use qc_03_replay_ledger::{Consumption, InMemoryReplayLedger, ReplayError, ReplayLedger, ScopeId};
    use qc_06_deposit_minter::MinterError;
    use shared_crypto::{invert_s, EcdsaSignature};
    use shared_types::TokenLedger;

    #[test]
    fn test_resubmitted_deposit_rejected() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let proof = d.notarize(&deposit);
        d.container.minter.mint(&deposit, &proof).unwrap();

        // Different signer subset, same payload
        let other_proof = d.committee.sign_with(&deposit, &[1, 2]);
        assert!(matches!(
            d.container.minter.mint(&deposit, &other_proof),
            Err(MinterError::Replay(ReplayError::PayloadAlreadyUsed { .. }))
        ));
        assert_eq!(d.container.ledger.total_supply(d.token()), 1_000);
    }

    #[test]
    fn test_batch_replay_of_consumed_payload_is_skipped() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let proof = d.notarize(&deposit);
        d.container.minter.mint(&deposit, &proof).unwrap();

        let outcome = d
            .container
            .minter
            .batch_mint(&[deposit.clone()], &[proof])
            .unwrap();
        assert!(outcome.minted.is_empty());
        assert_eq!(outcome.skipped, vec![payload_hash(&deposit)]);
        assert_eq!(d.container.ledger.total_supply(d.token()), 1_000);
    }

    #[test]
    fn test_v0_and_v1_of_same_deposit_are_distinct_payloads() {
        let d = Deployment::new(3);
        let v0 = d.deposit_v0(ALICE, 1_000, 0);
        let v1 = d.deposit_v1(ALICE, 1_000, 0);
        assert_ne!(payload_hash(&v0), payload_hash(&v1));
    }

    #[test]
    fn test_high_s_twin_rejected() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let proof = SignatureProof::decode(&d.notarize(&deposit)).unwrap();

        let slots = proof
            .slots()
            .iter()
            .map(|slot| match slot {
                ProofSlot::Signed(sig) => ProofSlot::Signed(EcdsaSignature {
                    r: sig.r,
                    s: invert_s(&sig.s),
                    v: sig.v,
                }),
                ProofSlot::Absent => ProofSlot::Absent,
            })
            .collect();
        let malleated = SignatureProof::new(slots).encode();

        assert!(matches!(
            d.container.minter.mint(&deposit, &malleated),
            Err(MinterError::Consortium(ConsortiumError::BadProof { .. }))
        ));
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);
    }

    #[test]
    fn test_scopes_are_independent() {
        let ledger = InMemoryReplayLedger::new();
        let hash = [0x5C; 32];
        let minter = ScopeId([0x06; 20]);
        let router = ScopeId([0x05; 20]);

        assert_eq!(ledger.try_consume(minter, hash), Consumption::Fresh);
        assert_eq!(ledger.try_consume(minter, hash), Consumption::AlreadyUsed);
        assert_eq!(ledger.try_consume(router, hash), Consumption::Fresh);
        assert!(ledger.is_consumed(router, &hash));
    }
}
