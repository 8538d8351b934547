//! # Privilege Escalation
//!
//! Every privileged entry point refuses callers without the matching role.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fixtures::{Deployment, ALICE, REPORTER};
    use qc_04_bascule::{Bascule, BasculeConfig, BasculeError, WithdrawalGate};
    use qc_05_asset_router::RouterError;
    use qc_06_deposit_minter::MinterError;
    use shared_types::{AccessError, ChainId, Role, TokenId, ZERO_ADDRESS};

    const MALLORY: [u8; 20] = [0x66; 20];

    #[test]
    fn test_router_admin_only() {
        let d = Deployment::new(3);
        let router = &d.container.router;
        let err = router
            .set_route(&MALLORY, TokenId([1; 32]), d.chain(), TokenId([2; 32]), ChainId::evm(10))
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Access(AccessError::MissingRole {
                role: Role::Admin,
                ..
            })
        ));
        assert!(matches!(
            router.grant_role(&MALLORY, Role::Admin, MALLORY),
            Err(RouterError::Access(_))
        ));
        assert!(matches!(
            router.set_burn_commission(&MALLORY, 0),
            Err(RouterError::Access(_))
        ));
    }

    #[test]
    fn test_minter_controls() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let minter = &d.container.minter;

        assert!(matches!(minter.toggle_withdrawals(&MALLORY), Err(MinterError::Access(_))));
        assert!(matches!(minter.pause(&MALLORY), Err(MinterError::Access(_))));
        assert!(matches!(minter.detach_bascule(&MALLORY), Err(MinterError::Access(_))));

        let rogue: Arc<dyn WithdrawalGate> =
            Arc::new(Bascule::new(BasculeConfig::new(ZERO_ADDRESS), MALLORY));
        assert!(matches!(
            minter.attach_bascule(&MALLORY, rogue),
            Err(MinterError::Access(_))
        ));

        // A pauser can stop the minter but not restart it
        minter.grant_role(&admin, Role::Pauser, ALICE).unwrap();
        minter.pause(&ALICE).unwrap();
        assert!(matches!(minter.unpause(&ALICE), Err(MinterError::Access(_))));
        let deposit = d.deposit_v0(ALICE, 10, 0);
        assert!(matches!(
            minter.mint(&deposit, &d.notarize(&deposit)),
            Err(MinterError::Pause(_))
        ));
        minter.unpause(&admin).unwrap();
        minter.mint(&deposit, &d.notarize(&deposit)).unwrap();
    }

    #[test]
    fn test_bascule_roles() {
        let d = Deployment::with_bascule(1_000);
        let bascule = d.bascule();
        let deposit = d.deposit_v0(ALICE, 5_000, 0);
        let (id, proof) = d.report_proof(&deposit);

        assert!(matches!(
            bascule.report_deposits(&MALLORY, [0; 32], &[id], &[proof]),
            Err(BasculeError::Access(_))
        ));
        // Only the minter account may consume withdrawals
        assert!(matches!(
            bascule.validate_withdrawal(&REPORTER, id, 5_000),
            Err(BasculeError::Access(_))
        ));
        assert!(matches!(
            bascule.update_validate_threshold(&MALLORY, 2_000),
            Err(BasculeError::Access(AccessError::CapabilityUnavailable { .. }))
        ));
        assert!(matches!(
            bascule.update_trusted_signer(&MALLORY, ZERO_ADDRESS),
            Err(BasculeError::Access(_))
        ));
        assert!(matches!(bascule.grant_guardian(&MALLORY, MALLORY), Err(BasculeError::Access(_))));
        assert_eq!(bascule.validate_threshold(), 1_000);
    }

    #[test]
    fn test_consortium_bootstrap_is_owner_only_and_once() {
        let d = Deployment::new(3);
        let set = d.committee.validator_set_action(0, 1);
        assert!(d
            .container
            .consortium
            .initialize_validator_set(&MALLORY, &set)
            .is_err());
        assert!(d
            .container
            .consortium
            .initialize_validator_set(&d.admin(), &set)
            .is_err());
        assert_eq!(d.container.consortium.epoch(), Some(0));
    }
}
