// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the predicate compaction primitives.
//!
//! Compares the sequential host scan against the chunked prefix-sum
//! device kernel across predicate densities.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use data_handler::pack;
use device_dispatch::DispatchContext;

fn predicate(n: usize, keep_every: usize) -> Vec<bool> {
    (0..n).map(|i| i % keep_every != 0).collect()
}

fn bench_pack(c: &mut Criterion) {
    let n = 1 << 18;
    let density: Vec<f64> = (0..n).map(|i| i as f64 * 0.25).collect();
    let energy: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();

    let mut group = c.benchmark_group("pack");
    for keep_every in [2usize, 10, 100] {
        let pred = predicate(n, keep_every);

        group.bench_with_input(
            BenchmarkId::new("host", keep_every),
            &pred,
            |b, pred| {
                let mut pd = vec![0.0; n];
                let mut pe = vec![0.0; n];
                b.iter(|| {
                    pack(
                        DispatchContext::host(),
                        black_box(pred),
                        n,
                        &[&density, &energy],
                        &mut [&mut pd, &mut pe],
                        false,
                    )
                    .unwrap()
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("device", keep_every),
            &pred,
            |b, pred| {
                let mut pd = vec![0.0; n];
                let mut pe = vec![0.0; n];
                b.iter(|| {
                    pack(
                        DispatchContext::device(),
                        black_box(pred),
                        n,
                        &[&density, &energy],
                        &mut [&mut pd, &mut pe],
                        false,
                    )
                    .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pack);
criterion_main!(benches);
