//! Benchmark for eligibility proving and verification

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zkjobs_prover::{
    CircuitKeys, Committer, Domain, EligibilityProver, PublicInputs, SkillInput,
    VerificationGateway,
};

/// Benchmark proving across domain widths
fn bench_skill_proving(c: &mut Criterion) {
    let mut group = c.benchmark_group("skill_proving");
    group.measurement_time(Duration::from_secs(30));
    group.sample_size(10);

    for bits in [16u32, 32, 64] {
        let domain = Domain::new(bits).unwrap();
        let prover = EligibilityProver::new(Arc::new(CircuitKeys::from_seed(domain, 1).unwrap()));
        let input = SkillInput::new(domain.max_value(), domain.max_value() / 2);

        group.bench_with_input(BenchmarkId::new("bits", bits), &input, |b, input| {
            b.iter(|| prover.prove(black_box(input)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark verification time
fn bench_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification");
    group.measurement_time(Duration::from_secs(20));

    let keys = Arc::new(CircuitKeys::from_seed(Domain::default(), 1).unwrap());
    let gateway = VerificationGateway::from_keys(&keys);
    let proof = EligibilityProver::new(keys)
        .prove(&SkillInput::new(85, 70))
        .unwrap();
    let inputs = PublicInputs::new(70);

    group.bench_function("groth16_verify", |b| {
        b.iter(|| {
            let verdict = gateway.verify(black_box(&proof.proof), black_box(&inputs), 70);
            assert!(verdict.is_accepted());
        });
    });

    group.finish();
}

/// Benchmark commitment hashing
fn bench_commitment(c: &mut Criterion) {
    let committer = Committer::default();
    let commitment = committer.generate(120_000).unwrap();

    c.bench_function("poseidon_commit", |b| {
        b.iter(|| committer.commit(black_box(120_000), &commitment.blinding_factor).unwrap());
    });
}

criterion_group!(
    benches,
    bench_skill_proving,
    bench_verification,
    bench_commitment,
);

criterion_main!(benches);
