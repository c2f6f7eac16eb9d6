use cachain_crypto::{automaton_hash, HashFunction, Sha256Hash};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("automaton_hash");
    for rule in [30u8, 90, 110] {
        group.bench_with_input(BenchmarkId::from_parameter(rule), &rule, |b, &rule| {
            b.iter(|| automaton_hash(black_box(b"message_test_42"), rule, 128))
        });
    }
    group.finish();
}

fn bench_reference(c: &mut Criterion) {
    c.bench_function("sha256", |b| {
        b.iter(|| Sha256Hash.digest_hex(black_box(b"message_test_42")))
    });
}

criterion_group!(benches, bench_rules, bench_reference);
criterion_main!(benches);
