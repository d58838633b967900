//! Criterion benchmarks for demur-decay.
//!
//! Covers factor computation at small, mid, and capped period counts, since
//! every ledger operation recomputes the factor from elapsed time.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use demur_core::constants::MAX_PERIODS;
use demur_core::traits::DecaySchedule;
use demur_decay::DecayEngine;

fn bench_factor_small(c: &mut Criterion) {
    let engine = DecayEngine::new();

    c.bench_function("factor_10_periods", |b| {
        b.iter(|| engine.factor_for_periods(black_box(10)))
    });
}

fn bench_factor_mid(c: &mut Criterion) {
    let engine = DecayEngine::new();

    c.bench_function("factor_1000_periods", |b| {
        b.iter(|| engine.factor_for_periods(black_box(1_000)))
    });
}

fn bench_factor_capped(c: &mut Criterion) {
    let engine = DecayEngine::new();

    c.bench_function("factor_at_cap", |b| {
        b.iter(|| engine.factor_for_periods(black_box(MAX_PERIODS)))
    });
}

criterion_group!(
    benches,
    bench_factor_small,
    bench_factor_mid,
    bench_factor_capped
);
criterion_main!(benches);
