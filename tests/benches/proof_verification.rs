//! # Quorum-Custody Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | qc-01 Action Codec | decode `DepositV0` | < 10μs |
//! | qc-02 Consortium | verify full-committee proof | < 1ms per signature |
//! | qc-06 Deposit Minter | batch mint | linear in batch size |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_01_action_codec::{decode, encode, Action, DepositV0};
use qc_02_consortium::testing::NotaryCommittee;
use qc_02_consortium::{Consortium, ConsortiumConfig, PayloadVerifier};
use qc_tests::fixtures::{Deployment, ALICE};
use rand::Rng;
use shared_types::ChainId;
use std::time::Duration;

const OWNER: [u8; 20] = [0xA0; 20];

fn random_deposit() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    encode(&DepositV0 {
        to_chain: ChainId::evm(1),
        recipient: rng.gen(),
        amount: rng.gen_range(1..u64::MAX),
        txid: rng.gen(),
        vout: rng.gen(),
    })
}

// ============================================================================
// QC-01: Action Codec
// ============================================================================

fn bench_action_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01-action-codec");
    let payload = random_deposit();

    group.bench_function("decode_deposit_v0", |b| {
        b.iter(|| black_box(decode::<DepositV0>(black_box(&payload)).is_ok()))
    });
    group.bench_function("decode_any", |b| {
        b.iter(|| black_box(Action::decode(black_box(&payload)).is_ok()))
    });
    group.finish();
}

// ============================================================================
// QC-02: Proof Verification
// ============================================================================

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-02-consortium");
    group.measurement_time(Duration::from_secs(10));

    for size in [4usize, 16, 64] {
        let committee = NotaryCommittee::new(&vec![1; size]);
        let consortium = Consortium::new(ConsortiumConfig::default(), OWNER);
        consortium
            .initialize_validator_set(&OWNER, &committee.validator_set_action(0, 1))
            .expect("bootstrap");
        let payload = random_deposit();
        let proof = committee.sign(&payload);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("verify_full_proof", size), &size, |b, _| {
            b.iter(|| black_box(consortium.verify(&payload, &proof).is_ok()))
        });
    }
    group.finish();
}

// ============================================================================
// QC-06: Batch Minting
// ============================================================================

fn bench_batch_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-06-deposit-minter");
    group.sample_size(10);

    for size in [10usize, 50] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batch_mint", size), &size, |b, &size| {
            b.iter_with_setup(
                || {
                    let d = Deployment::new(4);
                    let payloads: Vec<Vec<u8>> =
                        (0..size as u32).map(|i| d.deposit_v0(ALICE, 100, i)).collect();
                    let proofs: Vec<Vec<u8>> = payloads.iter().map(|p| d.notarize(p)).collect();
                    (d, payloads, proofs)
                },
                |(d, payloads, proofs)| {
                    black_box(d.container.minter.batch_mint(&payloads, &proofs).is_ok())
                },
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_action_decode,
    bench_proof_verification,
    bench_batch_mint,
);
criterion_main!(benches);
