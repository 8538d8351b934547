//! # Redeem Flows
//!
//! Burning tokens for a bitcoin payout: dust limits per output type,
//! commissions, and the withdrawal switch.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE};
    use qc_05_asset_router::{dust_limit, RouterError, DEFAULT_DUST_FEE_RATE, NATIVE_TOKEN_NAME};
    use qc_06_deposit_minter::{MinterError, MinterEvent};
    use shared_types::{ChainId, TokenId, TokenLedger};

    fn p2wpkh() -> Vec<u8> {
        let mut script = vec![0x00, 0x14];
        script.extend_from_slice(&[0x11; 20]);
        script
    }

    fn p2tr() -> Vec<u8> {
        let mut script = vec![0x51, 0x20];
        script.extend_from_slice(&[0x22; 32]);
        script
    }

    /// Deployment where ALICE holds `balance` and the minter charges `commission`.
    fn funded(balance: u64, commission: u64) -> Deployment {
        let d = Deployment::new(3);
        let admin = d.admin();
        let minter = &d.container.minter;
        minter
            .grant_role(&admin, shared_types::Role::Operator, admin)
            .unwrap();
        minter.set_burn_commission(&admin, commission).unwrap();
        let deposit = d.deposit_v0(ALICE, balance, 0);
        minter.mint(&deposit, &d.notarize(&deposit)).unwrap();
        d
    }

    #[test]
    fn test_dust_limits_per_output_type() {
        assert_eq!(dust_limit(&p2wpkh(), DEFAULT_DUST_FEE_RATE), Ok(294));
        assert_eq!(dust_limit(&p2tr(), DEFAULT_DUST_FEE_RATE), Ok(330));
    }

    /// With commission `c` and dust limit `l`, `c + l + 1` redeems and
    /// `c + l` does not.
    #[test]
    fn test_dust_boundary_through_minter() {
        let commission = 10;
        let d = funded(10_000, commission);
        let minter = &d.container.minter;
        let limit = 294;

        assert_eq!(
            minter.redeem(&ALICE, &p2wpkh(), commission + limit),
            Err(MinterError::Router(RouterError::AmountBelowDustLimit {
                amount_after_fee: limit,
                dust_limit: limit
            }))
        );
        assert_eq!(d.container.ledger.balance_of(d.token(), &ALICE), 10_000);

        let receipt = minter.redeem(&ALICE, &p2wpkh(), commission + limit + 1).unwrap();
        assert_eq!(receipt.amount_after_fee, limit + 1);
        assert_eq!(receipt.commission, commission);
        assert_eq!(
            d.container.ledger.balance_of(d.token(), &ALICE),
            10_000 - commission - limit - 1
        );
        assert_eq!(d.container.ledger.balance_of(d.token(), &d.treasury()), commission);
        assert!(matches!(
            minter.events().snapshot().last(),
            Some(MinterEvent::UnstakeRequest { amount_after_fee, .. }) if *amount_after_fee == limit + 1
        ));
    }

    #[test]
    fn test_redeem_rejections() {
        let d = funded(10_000, 50);
        let minter = &d.container.minter;

        assert_eq!(
            minter.redeem(&ALICE, &p2wpkh(), 50),
            Err(MinterError::Router(RouterError::AmountLessThanCommission {
                amount: 50,
                commission: 50
            }))
        );
        assert_eq!(
            minter.redeem(&ALICE, &[0x76, 0xa9, 0x14], 5_000),
            Err(MinterError::Router(RouterError::ScriptPubkeyUnsupported))
        );

        minter.toggle_withdrawals(&d.admin()).unwrap();
        assert_eq!(
            minter.redeem(&ALICE, &p2wpkh(), 5_000),
            Err(MinterError::WithdrawalsDisabled)
        );
        assert_eq!(d.container.ledger.balance_of(d.token(), &ALICE), 10_000);
    }

    #[test]
    fn test_native_redeem_through_router() {
        let d = Deployment::new(3);
        let admin = d.admin();
        let router = &d.container.router;
        let native = TokenId([0x4A; 32]);
        router.set_named_token(&admin, NATIVE_TOKEN_NAME, native).unwrap();
        router
            .set_route(&admin, native, d.chain(), TokenId([0xBC; 32]), ChainId::BITCOIN_MAINNET)
            .unwrap();
        d.container.ledger.mint(native, ALICE, 1_000).unwrap();

        let issued = router.redeem_native(&ALICE, &p2tr(), 400).unwrap();
        assert_eq!(issued.amount_after_fee, 400);
        assert_eq!(d.container.ledger.balance_of(native, &ALICE), 600);

        assert!(matches!(
            router.redeem_native(&ALICE, &p2tr(), 330),
            Err(RouterError::AmountBelowDustLimit { .. })
        ));
    }
}
