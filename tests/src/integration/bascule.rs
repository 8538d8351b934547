//! # Bascule Flows
//!
//! Reporter, minter, and guardian interacting with one Bascule.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE, REPORTER};
    use qc_01_action_codec::deposit_id;
    use qc_04_bascule::{BasculeError, BasculeEvent, DepositState, WithdrawalOutcome};
    use qc_06_deposit_minter::MinterError;
    use shared_crypto::{eth_signed_message_hash, Secp256k1KeyPair};
    use shared_types::{AccessError, Role, TokenLedger};

    const THRESHOLD: u64 = 1_000;

    #[test]
    fn test_large_withdrawal_requires_report() {
        let d = Deployment::with_bascule(THRESHOLD);
        let minter = &d.container.minter;
        let deposit = d.deposit_v0(ALICE, 5_000, 0);
        let proof = d.notarize(&deposit);

        let err = minter.mint(&deposit, &proof).unwrap_err();
        assert!(matches!(
            err,
            MinterError::Bascule(BasculeError::WithdrawalFailedValidation { amount: 5_000, .. })
        ));
        // Rejected before consumption: the payload is still honourable
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);

        let (id, report) = d.report_proof(&deposit);
        d.bascule()
            .report_deposits(&REPORTER, [0x01; 32], &[id], &[report])
            .unwrap();
        assert_eq!(d.bascule().deposit_state(&id), DepositState::Reported);

        let receipt = minter.mint(&deposit, &proof).unwrap();
        assert_eq!(receipt.bascule, Some(WithdrawalOutcome::Validated));
        assert_eq!(d.bascule().deposit_state(&id), DepositState::Withdrawn);
    }

    #[test]
    fn test_small_withdrawal_passes_unvalidated() {
        let d = Deployment::with_bascule(THRESHOLD);
        let deposit = d.deposit_v0(ALICE, THRESHOLD - 1, 0);
        let receipt = d.container.minter.mint(&deposit, &d.notarize(&deposit)).unwrap();
        assert_eq!(receipt.bascule, Some(WithdrawalOutcome::NotValidated));
        assert_eq!(
            d.bascule().deposit_state(&deposit_id(&deposit)),
            DepositState::Withdrawn
        );
    }

    #[test]
    fn test_double_report_stays_reported() {
        let d = Deployment::with_bascule(THRESHOLD);
        let deposit = d.deposit_v0(ALICE, 5_000, 0);
        let (id, report) = d.report_proof(&deposit);
        let bascule = d.bascule();

        let first = bascule
            .report_deposits(&REPORTER, [0x01; 32], &[id], &[report.clone()])
            .unwrap();
        assert_eq!(first.newly_reported, 1);

        let second = bascule
            .report_deposits(&REPORTER, [0x02; 32], &[id], &[report])
            .unwrap();
        assert_eq!(second.newly_reported, 0);
        assert_eq!(second.already_reported, 1);
        assert_eq!(bascule.deposit_state(&id), DepositState::Reported);
        assert!(bascule
            .events()
            .snapshot()
            .contains(&BasculeEvent::DepositAlreadyReported { deposit_id: id }));
    }

    #[test]
    fn test_report_signed_by_stranger_rejected() {
        let d = Deployment::with_bascule(THRESHOLD);
        let deposit = d.deposit_v0(ALICE, 5_000, 0);
        let id = deposit_id(&deposit);
        let stranger = Secp256k1KeyPair::generate();
        let forged = stranger
            .sign_prehash(&eth_signed_message_hash(&id))
            .unwrap()
            .to_vec();

        let err = d
            .bascule()
            .report_deposits(&REPORTER, [0x01; 32], &[id], &[forged])
            .unwrap_err();
        assert!(matches!(err, BasculeError::BadDepositProof { .. }));
        assert_eq!(d.bascule().deposit_state(&id), DepositState::Unreported);
    }

    #[test]
    fn test_guardian_raises_threshold_once() {
        let d = Deployment::with_bascule(THRESHOLD);
        let bascule = d.bascule();
        let guardian = [0x6A; 20];
        bascule.grant_guardian(&d.admin(), guardian).unwrap();
        assert!(bascule.has_role(Role::ValidationGuardian, &guardian));

        bascule
            .update_validate_threshold(&guardian, THRESHOLD + 5)
            .unwrap();
        assert_eq!(bascule.validate_threshold(), THRESHOLD + 5);
        assert!(!bascule.has_role(Role::ValidationGuardian, &guardian));

        let err = bascule
            .update_validate_threshold(&guardian, THRESHOLD + 10)
            .unwrap_err();
        assert!(matches!(
            err,
            BasculeError::Access(AccessError::CapabilityUnavailable { .. })
        ));
        assert_eq!(bascule.validate_threshold(), THRESHOLD + 5);

        // Lowering is an admin action
        bascule.update_validate_threshold(&d.admin(), 0).unwrap();
        assert_eq!(bascule.validate_threshold(), 0);
    }

    #[test]
    fn test_paused_bascule_blocks_minting() {
        let d = Deployment::with_bascule(THRESHOLD);
        let admin = d.admin();
        let bascule = d.bascule();
        bascule.grant_role(&admin, Role::Pauser, admin).unwrap();
        bascule.pause(&admin).unwrap();

        let deposit = d.deposit_v0(ALICE, 10, 0);
        let err = d.container.minter.mint(&deposit, &d.notarize(&deposit)).unwrap_err();
        assert!(matches!(err, MinterError::Bascule(BasculeError::Pause(_))));

        bascule.unpause(&admin).unwrap();
        d.container.minter.mint(&deposit, &d.notarize(&deposit)).unwrap();
    }
}
