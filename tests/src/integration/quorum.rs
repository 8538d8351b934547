//! # Weighted Quorum, End to End
//!
//! For arbitrary weights and signer subsets, a deposit mints exactly when
//! the signing weight reaches `ceil(total * 2 / 3)`.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE};
    use proptest::prelude::*;
    use qc_02_consortium::quorum_threshold;
    use shared_types::TokenLedger;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn mint_succeeds_iff_quorum_reached(
            weights in prop::collection::vec(1u64..50, 1..6),
            mask in any::<u8>(),
        ) {
            let d = Deployment::build(&weights, None);
            let signers: Vec<usize> = (0..weights.len()).filter(|i| mask & (1 << i) != 0).collect();
            let signed: u64 = signers.iter().map(|i| weights[*i]).sum();
            let total: u64 = weights.iter().sum();

            let deposit = d.deposit_v0(ALICE, 1_000, 0);
            let proof = d.committee.sign_with(&deposit, &signers);
            let result = d.container.minter.mint(&deposit, &proof);

            let reached = signed >= quorum_threshold(total, 2, 3);
            prop_assert_eq!(result.is_ok(), reached);
            let expected = if reached { 1_000 } else { 0 };
            prop_assert_eq!(d.container.ledger.total_supply(d.token()), expected);
        }
    }

    #[test]
    fn test_two_of_three_is_enough() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let proof = d.committee.sign_with(&deposit, &[0, 2]);
        d.container.minter.mint(&deposit, &proof).unwrap();
    }

    #[test]
    fn test_heavy_validator_alone_reaches_quorum() {
        let d = Deployment::build(&[10, 1, 1, 1], None);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        // threshold = ceil(13 * 2 / 3) = 9
        let proof = d.committee.sign_with(&deposit, &[0]);
        d.container.minter.mint(&deposit, &proof).unwrap();
    }
}
