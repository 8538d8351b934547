//! # Validator-Set Rotation
//!
//! The current set signs its successor; epochs advance by exactly one and
//! proofs from a retired set stop verifying.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Deployment, ALICE};
    use custody_runtime::{DispatchOutcome, Envelope};
    use qc_02_consortium::testing::NotaryCommittee;
    use qc_02_consortium::{ConsortiumError, ConsortiumEvent};
    use qc_06_deposit_minter::MinterError;

    #[test]
    fn test_rotate_to_next_epoch() {
        let d = Deployment::new(3);
        let consortium = &d.container.consortium;
        let next = NotaryCommittee::new(&[3, 3, 3, 3]);

        let payload = next.validator_set_payload(1, 10);
        assert_eq!(consortium.rotate(&payload, &d.notarize(&payload)), Ok(1));
        assert_eq!(consortium.epoch(), Some(1));
        assert_eq!(consortium.current_validator_set().unwrap().len(), 4);
        // Retired sets stay queryable
        assert!(consortium.validator_set(0).is_some());
    }

    #[test]
    fn test_epoch_must_advance_by_one() {
        let d = Deployment::new(3);
        let consortium = &d.container.consortium;
        let next = NotaryCommittee::new(&[1, 1, 1]);

        let skip = next.validator_set_payload(2, 10);
        assert_eq!(
            consortium.rotate(&skip, &d.notarize(&skip)),
            Err(ConsortiumError::InvalidEpoch {
                expected: 1,
                actual: 2
            })
        );

        let same = next.validator_set_payload(0, 10);
        assert!(matches!(
            consortium.rotate(&same, &d.notarize(&same)),
            Err(ConsortiumError::InvalidEpoch { .. })
        ));
        assert_eq!(consortium.epoch(), Some(0));
    }

    #[test]
    fn test_successor_must_be_signed_by_current_set() {
        let d = Deployment::new(3);
        let usurper = NotaryCommittee::new(&[1, 1, 1]);
        let payload = usurper.validator_set_payload(1, 10);

        // Self-signed by the incoming set, not the current one
        let err = d
            .container
            .consortium
            .rotate(&payload, &usurper.sign(&payload))
            .unwrap_err();
        assert!(matches!(
            err,
            ConsortiumError::NotEnoughSignatures { .. } | ConsortiumError::BadProof { .. }
        ));
        assert_eq!(d.container.consortium.epoch(), Some(0));
    }

    #[test]
    fn test_retired_set_cannot_mint() {
        let d = Deployment::new(3);
        let next = NotaryCommittee::new(&[1, 1, 1, 1]);
        let dispatcher = d.dispatcher();

        let payload = next.validator_set_payload(1, 10);
        let outcome = dispatcher
            .dispatch(&Envelope::Single {
                proof: d.notarize(&payload),
                payload,
            })
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::ValidatorSetRotated { epoch: 1 });
        assert!(matches!(
            d.container.consortium.events().snapshot().last(),
            Some(ConsortiumEvent::ValidatorSetUpdated { epoch: 1, .. })
        ));

        let deposit = d.deposit_v0(ALICE, 100, 0);
        let stale = d.container.minter.mint(&deposit, &d.notarize(&deposit));
        assert!(matches!(stale, Err(MinterError::Consortium(_))));

        d.container
            .minter
            .mint(&deposit, &next.sign(&deposit))
            .unwrap();
    }
}
