//! # Forged Proofs
//!
//! Proofs that look plausible but must never verify: reordered slots,
//! duplicated signers, outsiders, truncation.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE};
    use qc_02_consortium::testing::NotaryCommittee;
    use qc_02_consortium::{ConsortiumError, PayloadVerifier, SignatureProof};
    use qc_06_deposit_minter::MinterError;
    use shared_types::TokenLedger;

    fn consortium_error(result: Result<qc_06_deposit_minter::MintReceipt, MinterError>) -> ConsortiumError {
        match result {
            Err(MinterError::Consortium(e)) => e,
            other => panic!("expected consortium rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_permuted_slots_rejected() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let swapped = d.committee.sign_permuted(&deposit, &[1, 0, 2]);
        consortium_error(d.container.minter.mint(&deposit, &swapped));
        assert_eq!(d.container.ledger.total_supply(d.token()), 0);
    }

    #[test]
    fn test_duplicated_signer_counts_once_at_most() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        // Validator 0 signs every slot
        let stuffed = d.committee.sign_permuted(&deposit, &[0, 0, 0]);
        consortium_error(d.container.minter.mint(&deposit, &stuffed));
    }

    #[test]
    fn test_outsider_committee_rejected() {
        let d = Deployment::new(3);
        let outsiders = NotaryCommittee::new(&[1, 1, 1]);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        consortium_error(d.container.minter.mint(&deposit, &outsiders.sign(&deposit)));
    }

    #[test]
    fn test_wrong_slot_count_rejected() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let full = SignatureProof::decode(&d.notarize(&deposit)).unwrap();
        let short = SignatureProof::new(full.slots()[..2].to_vec()).encode();
        assert_eq!(
            d.container.consortium.verify(&deposit, &short).map(|v| v.epoch),
            Err(ConsortiumError::SignatureCountMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_proof_over_different_payload_rejected() {
        let d = Deployment::new(3);
        let honest = d.deposit_v0(ALICE, 10, 0);
        let inflated = d.deposit_v0(ALICE, 10_000, 0);
        let proof = d.notarize(&honest);
        consortium_error(d.container.minter.mint(&inflated, &proof));
        assert!(d.container.minter.mint(&honest, &proof).is_ok());
    }

    #[test]
    fn test_truncated_proof_is_bad_proof() {
        let d = Deployment::new(3);
        let deposit = d.deposit_v0(ALICE, 1_000, 0);
        let proof = d.notarize(&deposit);
        assert!(matches!(
            consortium_error(d.container.minter.mint(&deposit, &proof[..proof.len() - 1])),
            ConsortiumError::BadProof { .. }
        ));
    }
}
