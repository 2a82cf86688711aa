// ABOUTME: Criterion benchmarks for the uniform random generator
// ABOUTME: Measures integer draws across bound widths and corrected-mode string assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Criterion benchmarks for uniform random generation.
//!
//! Integer draws are measured at bounds just below and just above byte-width
//! boundaries (the latter reject roughly half of all candidates), plus the
//! string assembly used for key material.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keymint::random::{random_int, random_string};

fn bench_random_int(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_int");

    // 256 fills a byte exactly (no rejection); 257 sits just past the
    // boundary and rejects just under half of its 9-bit candidates.
    for max in [36u64, 256, 257, 1u64 << 32] {
        group.bench_with_input(BenchmarkId::from_parameter(max), &max, |b, &max| {
            b.iter(|| random_int(black_box(max)).unwrap());
        });
    }

    group.finish();
}

fn bench_random_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_string");

    for length in [10usize, 32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| random_string(black_box(length)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_random_int, bench_random_string);
criterion_main!(benches);
