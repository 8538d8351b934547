//! # Deposit Minting Flows
//!
//! Notarized deposits entering through the minter, singly and in batches.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE, BOB};
    use qc_01_action_codec::{encode, payload_hash, FeeApproval};
    use qc_06_deposit_minter::{FeeClaim, MinterError, MinterEvent};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{Role, TokenLedger};

    // =========================================================================
    // SINGLE MINTS
    // =========================================================================

    #[test]
    fn test_v0_and_v1_deposits_credit_recipient() {
        let d = Deployment::new(3);
        let minter = &d.container.minter;

        let v0 = d.deposit_v0(ALICE, 1_000, 0);
        let v1 = d.deposit_v1(ALICE, 500, 0);
        minter.mint(&v0, &d.notarize(&v0)).unwrap();
        minter.mint_v1(&v1, &d.notarize(&v1)).unwrap();

        assert_eq!(d.container.ledger.balance_of(d.token(), &ALICE), 1_500);
        assert_eq!(d.container.ledger.total_supply(d.token()), 1_500);
    }

    #[test]
    fn test_v1_payload_rejected_by_v0_entry_point() {
        let d = Deployment::new(3);
        let v1 = d.deposit_v1(ALICE, 500, 0);
        let err = d.container.minter.mint(&v1, &d.notarize(&v1)).unwrap_err();
        assert!(matches!(err, MinterError::Codec(_)));
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);
    }

    // =========================================================================
    // BATCH MINTS
    // =========================================================================

    /// `[p1, p1, p2]`: the duplicate is skipped, both distinct payloads mint.
    #[test]
    fn test_batch_with_duplicate_skips_replay() {
        let d = Deployment::new(3);
        let minter = &d.container.minter;
        let p1 = d.deposit_v0(ALICE, 100, 0);
        let p2 = d.deposit_v0(BOB, 200, 1);
        let proofs = vec![d.notarize(&p1), d.notarize(&p1), d.notarize(&p2)];

        let outcome = minter
            .batch_mint(&[p1.clone(), p1.clone(), p2.clone()], &proofs)
            .unwrap();
        assert_eq!(outcome.minted.len(), 2);
        assert_eq!(outcome.skipped, vec![payload_hash(&p1)]);

        let events = minter.events().snapshot();
        assert_eq!(
            events,
            vec![
                MinterEvent::MintProofConsumed {
                    recipient: ALICE,
                    payload_hash: payload_hash(&p1),
                    amount: 100
                },
                MinterEvent::BatchMintSkipped {
                    payload_hash: payload_hash(&p1)
                },
                MinterEvent::MintProofConsumed {
                    recipient: BOB,
                    payload_hash: payload_hash(&p2),
                    amount: 200
                },
            ]
        );
        assert_eq!(d.container.ledger.balance_of(d.token(), &ALICE), 100);
        assert_eq!(d.container.ledger.balance_of(d.token(), &BOB), 200);
    }

    #[test]
    fn test_batch_with_one_bad_proof_mints_nothing() {
        let d = Deployment::new(3);
        let p1 = d.deposit_v0(ALICE, 100, 0);
        let p2 = d.deposit_v0(BOB, 200, 1);
        let weak = d.committee.sign_with(&p2, &[0]);

        let err = d
            .container
            .minter
            .batch_mint(&[p1.clone(), p2], &[d.notarize(&p1), weak])
            .unwrap_err();
        assert!(matches!(err, MinterError::Consortium(_)));
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);

        // Nothing consumed: p1 still mints on its own
        d.container.minter.mint(&p1, &d.notarize(&p1)).unwrap();
    }

    /// A credit overflow on the last item rolls back the whole batch.
    #[test]
    fn test_batch_failing_credit_applies_nothing() {
        let d = Deployment::with_bascule(u64::MAX);
        let ledger = &d.container.ledger;
        ledger.mint(d.token(), BOB, u64::MAX - 50).unwrap();
        let p1 = d.deposit_v0(ALICE, 3, 0);
        let p2 = d.deposit_v0(BOB, 10, 1);
        let proofs = vec![d.notarize(&p1), d.notarize(&p2)];

        let err = d
            .container
            .minter
            .batch_mint(&[p1.clone(), p2.clone()], &proofs)
            .unwrap_err();
        assert!(matches!(err, MinterError::Ledger(_)));
        assert_eq!(ledger.balance_of(d.token(), &ALICE), 0);

        ledger.burn(d.token(), BOB, 1_000).unwrap();
        let outcome = d.container.minter.batch_mint(&[p1, p2], &proofs).unwrap();
        assert_eq!(outcome.minted.len(), 2);
        assert!(outcome.skipped.is_empty());
        assert_eq!(ledger.balance_of(d.token(), &ALICE), 3);
    }

    #[test]
    fn test_mint_without_validator_role_can_retry() {
        let d = Deployment::with_bascule(u64::MAX);
        let bascule = d.container.bascule.as_ref().unwrap();
        let minter_address = d.container.config.identity.minter_address;
        bascule
            .revoke_role(&d.admin(), Role::WithdrawalValidator, minter_address)
            .unwrap();

        let p1 = d.deposit_v0(ALICE, 100, 0);
        let err = d.container.minter.mint(&p1, &d.notarize(&p1)).unwrap_err();
        assert!(matches!(err, MinterError::Bascule(_)));

        bascule
            .grant_role(&d.admin(), Role::WithdrawalValidator, minter_address)
            .unwrap();
        d.container.minter.mint(&p1, &d.notarize(&p1)).unwrap();
        assert_eq!(d.container.ledger.balance_of(d.token(), &ALICE), 100);
    }

    #[test]
    fn test_batch_length_mismatch() {
        let d = Deployment::new(3);
        let p1 = d.deposit_v0(ALICE, 100, 0);
        assert_eq!(
            d.container.minter.batch_mint(&[p1], &[]),
            Err(MinterError::NonEqualLength {
                payloads: 1,
                other: 0
            })
        );
    }

    // =========================================================================
    // FEE-CHARGING MINTS
    // =========================================================================

    #[test]
    fn test_claimer_charges_capped_fee() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let claimer = [0xC1; 20];
        let minter = &d.container.minter;
        minter.grant_role(&admin, Role::Claimer, claimer).unwrap();
        minter.grant_role(&admin, Role::Operator, admin).unwrap();
        minter.set_maximum_fee(&admin, 30).unwrap();

        let user = Secp256k1KeyPair::generate();
        let deposit = d.deposit_v1(user.address(), 1_000, 0);
        let fee_payload = encode(&FeeApproval { fee: 50, deadline: 100 });
        let signature = user.sign_prehash(&payload_hash(&fee_payload)).unwrap().to_vec();

        let receipt = minter
            .mint_v1_with_fee(
                &claimer,
                &deposit,
                &d.notarize(&deposit),
                FeeClaim {
                    fee_payload: &fee_payload,
                    user_signature: &signature,
                },
                100,
            )
            .unwrap();
        assert_eq!(receipt.fee, 30);
        assert_eq!(receipt.amount, 970);
        assert_eq!(d.container.ledger.balance_of(d.token(), &user.address()), 970);
        assert_eq!(d.container.ledger.balance_of(d.token(), &d.treasury()), 30);
    }

    #[test]
    fn test_fee_mint_requires_claimer_and_fresh_approval() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let claimer = [0xC1; 20];
        let minter = &d.container.minter;

        let user = Secp256k1KeyPair::generate();
        let deposit = d.deposit_v1(user.address(), 1_000, 0);
        let proof = d.notarize(&deposit);
        let fee_payload = encode(&FeeApproval { fee: 5, deadline: 100 });
        let signature = user.sign_prehash(&payload_hash(&fee_payload)).unwrap().to_vec();
        let claim = || FeeClaim {
            fee_payload: &fee_payload,
            user_signature: &signature,
        };

        assert!(matches!(
            minter.mint_v1_with_fee(&claimer, &deposit, &proof, claim(), 0),
            Err(MinterError::Access(_))
        ));

        minter.grant_role(&admin, Role::Claimer, claimer).unwrap();
        assert_eq!(
            minter.mint_v1_with_fee(&claimer, &deposit, &proof, claim(), 101),
            Err(MinterError::UserSignatureExpired {
                deadline: 100,
                now: 101
            })
        );
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);
    }
}
