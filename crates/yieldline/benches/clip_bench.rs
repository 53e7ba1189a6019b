//! Criterion benchmarks for polygon clipping and containment.
//! Focus sizes: rings with 4..64 vertices.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use yieldline::geom::{Polygon, Segment, Vec2};

fn regular_polygon(n: usize) -> Polygon {
    let mut poly = Polygon::new();
    for k in 0..n {
        let theta = k as f64 / n as f64 * std::f64::consts::TAU;
        poly.add_point(Vec2::new(theta.cos(), theta.sin()));
    }
    poly
}

fn bench_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    for &n in &[4usize, 8, 16, 32, 64] {
        let line = Segment::new(Vec2::new(0.1, -10.0), Vec2::new(0.2, 10.0));
        group.bench_with_input(BenchmarkId::new("clip_left", n), &n, |b, &n| {
            b.iter_batched(
                || regular_polygon(n),
                |poly| {
                    let _parts = poly.clip_left(&line);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("point_in", n), &n, |b, &n| {
            let poly = regular_polygon(n);
            b.iter(|| poly.point_in(Vec2::new(0.3, 0.2)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_clip);
criterion_main!(benches);
