use std::fmt::Write as _;
use std::sync::atomic::AtomicBool;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dataguard::builder::PlanBuilder;
use dataguard::engine::{self, EngineOptions};
use dataguard::reader::CsvReader;

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from("id,amount\n");
    for i in 0..rows {
        writeln!(csv, "{i},{}", (i % 1000) as f64 / 10.0).unwrap();
    }
    csv
}

fn bench_batch_sizes(c: &mut Criterion) {
    let csv = synthetic_csv(50_000);
    let mut group = c.benchmark_group("batch_size");
    for batch_size in [64usize, 1024, 8192] {
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch_size, |b, &batch_size| {
            b.iter(|| {
                let mut plan = PlanBuilder::new("amounts")
                    .integer_column("id")
                    .is_unique()
                    .end_column()
                    .unwrap()
                    .float_column("amount")
                    .between(0.0, 100.0)
                    .end_column()
                    .unwrap()
                    .finalize()
                    .unwrap();
                let cancel = AtomicBool::new(false);
                engine::run(
                    &mut plan,
                    || CsvReader::from_text(&csv),
                    EngineOptions {
                        batch_size,
                        sample_cap: 10,
                    },
                    &cancel,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

/// A scalar per-row baseline with no batching, no reusable buffers, and no
/// null-skipping reuse: parse and check each cell in isolation. Gives the
/// batched engine above something to be measured against.
fn bench_scalar_baseline(c: &mut Criterion) {
    let csv = synthetic_csv(50_000);
    c.bench_function("scalar_baseline", |b| {
        b.iter(|| {
            let mut ids_seen = std::collections::HashSet::new();
            let mut passed = 0usize;
            for line in csv.lines().skip(1) {
                let Some((id_raw, amount_raw)) = line.split_once(',') else {
                    continue;
                };
                let id_ok = id_raw.parse::<i64>().map(|id| ids_seen.insert(id)).unwrap_or(false);
                let amount_ok = amount_raw
                    .parse::<f64>()
                    .map(|a| (0.0..=100.0).contains(&a))
                    .unwrap_or(false);
                if id_ok && amount_ok {
                    passed += 1;
                }
            }
            passed
        });
    });
}

criterion_group!(benches, bench_batch_sizes, bench_scalar_baseline);
criterion_main!(benches);
