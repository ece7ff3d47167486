//! Benchmarks for reference table reconciliation.
//!
//! Covers the pure row merge at a few table sizes and the CSV codec that
//! surrounds it on every provisioning run.

use bmad_provisioner::merge::merge_rows;
use bmad_provisioner::table::{Row, RowCollection};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const HEADER: [&str; 4] = ["key", "priority", "category", "notes"];

/// Template table with `n` rows.
fn desired_table(n: usize) -> RowCollection {
    let rows = (0..n)
        .map(|i| {
            Row::new([
                format!("item-{:05}", i),
                "HIGH".to_string(),
                format!("category-{}", i % 7),
                "generated".to_string(),
            ])
        })
        .collect();
    RowCollection::new(HEADER, rows)
}

/// An installed copy of the template after some drift: every 10th row
/// edited, every 7th row re-cased, a tail of custom rows, and the last
/// fifth of the template not installed yet.
fn installed_table(n: usize) -> RowCollection {
    let mut rows: Vec<Row> = (0..n * 4 / 5)
        .map(|i| {
            let priority = match i {
                i if i % 10 == 0 => "LOW",
                i if i % 7 == 0 => " high ",
                _ => "HIGH",
            };
            Row::new([
                format!("item-{:05}", i),
                priority.to_string(),
                format!("category-{}", i % 7),
                "generated".to_string(),
            ])
        })
        .collect();
    rows.extend((0..n / 20).map(|i| {
        Row::new([
            format!("custom-{:04}", i),
            "MEDIUM".to_string(),
            "local".to_string(),
            "added by hand".to_string(),
        ])
    }));
    RowCollection::new(HEADER, rows)
}

/// Benchmarks the keyed merge against a drifted installation.
fn bench_merge_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_rows");

    for size in [50, 500, 5000] {
        let desired = desired_table(size);
        let installed = installed_table(size);

        group.bench_with_input(BenchmarkId::new("drifted", size), &size, |b, _| {
            b.iter(|| merge_rows(black_box(Some(&installed)), black_box(&desired), 0))
        });
        group.bench_with_input(BenchmarkId::new("fresh_install", size), &size, |b, _| {
            b.iter(|| merge_rows(black_box(None), black_box(&desired), 0))
        });
    }

    group.finish();
}

/// Benchmarks reading and writing the CSV form of a table.
fn bench_csv_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_codec");
    let table = installed_table(1000);
    let content = table.to_csv_string().unwrap();

    group.bench_function("parse", |b| {
        b.iter(|| RowCollection::from_csv_str(black_box(&content)).unwrap())
    });
    group.bench_function("serialize", |b| {
        b.iter(|| black_box(&table).to_csv_string().unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_merge_rows, bench_csv_codec);
criterion_main!(benches);
