//! Criterion benchmarks for domain discretisation and candidate pruning.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use yieldline::prelude::*;

fn square_domain() -> Domain {
    let mut domain = Domain::new();
    domain.add_boundary_point(Vec2::new(0.0, 0.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(1.0, 0.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(1.0, 1.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(0.0, 1.0), EdgeKind::Fixed);
    domain
}

fn bench_discretize(c: &mut Criterion) {
    let mut group = c.benchmark_group("discretize");
    group.sample_size(10);
    for &size in &[0.5f64, 0.25] {
        group.bench_with_input(
            BenchmarkId::new("build_edges", format!("{size}")),
            &size,
            |b, &size| {
                b.iter_batched(
                    || {
                        let mut domain = square_domain();
                        domain.discretize(size).unwrap();
                        domain
                    },
                    |mut domain| domain.build_edges(),
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_discretize);
criterion_main!(benches);
