use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

extern crate framestore;

use framestore::table::{Table, TableBuilder};

const COLUMNS: [&str; 5] = ["A", "B", "C", "D", "E"];

// Populate a double table in one pass from a fill function
pub fn bench_of_doubles(c: &mut Criterion) {
    let mut group = c.benchmark_group("OfDoubles");
    group.sample_size(10);

    for rows in [100_000usize, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut rng = rand::thread_rng();
                let table = Table::of_doubles(0..rows, COLUMNS, |_, _| rng.r#gen::<f64>()).unwrap();
                black_box(table.row_count())
            })
        });
    }

    group.finish();
}

// Populate the same shape cell by cell through the builder
pub fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("Builder");
    group.sample_size(10);

    for rows in [100_000usize, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("unguarded", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut rng = rand::thread_rng();
                let mut builder = TableBuilder::with_capacity(rows, COLUMNS.len());
                for row in 0..rows {
                    for col in COLUMNS {
                        builder.put_double(row, col, rng.r#gen::<f64>());
                    }
                }
                black_box(builder.build().row_count())
            })
        });

        group.bench_with_input(BenchmarkId::new("sparse", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut rng = rand::thread_rng();
                let mut builder = TableBuilder::with_capacity(rows, COLUMNS.len());
                for col in COLUMNS {
                    builder.fill_pct(col, 0.1).unwrap();
                }
                for row in (0..rows).step_by(10) {
                    for col in COLUMNS {
                        builder.put_double(row, col, rng.r#gen::<f64>());
                    }
                }
                black_box(builder.build().row_count())
            })
        });

        group.bench_with_input(BenchmarkId::new("thread_safe", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut rng = rand::thread_rng();
                let builder = TableBuilder::with_capacity(rows, COLUMNS.len()).thread_safe();
                for row in 0..rows {
                    for col in COLUMNS {
                        builder.put_double(row, col, rng.r#gen::<f64>());
                    }
                }
                black_box(builder.build().row_count())
            })
        });
    }

    group.finish();
}

// Aggregate a built table column by column
pub fn bench_column_stats(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let table = Table::of_doubles(0..1_000_000usize, COLUMNS, |_, _| rng.r#gen::<f64>()).unwrap();

    let mut group = c.benchmark_group("ColumnStats");
    group.bench_function("mean", |b| {
        b.iter(|| {
            for col in COLUMNS {
                black_box(table.column(&col).unwrap().mean().unwrap());
            }
        })
    });
    group.bench_function("median", |b| {
        b.iter(|| black_box(table.column(&"A").unwrap().median().unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_of_doubles, bench_builder, bench_column_stats);
criterion_main!(benches);
