//! Benchmarks for cubic Bézier segment operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use curvum::curves::{cubic_derivative, CubicBezier3};
use curvum::Point3;

fn sample_curve() -> CubicBezier3<f64> {
    CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 10.0, 2.0),
        Point3::new(7.0, 10.0, -2.0),
        Point3::new(10.0, 0.0, 0.0),
    )
}

fn bench_cubic_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubic_bezier3_eval");
    let curve = sample_curve();

    group.bench_function("single", |b| b.iter(|| curve.eval(black_box(0.5))));

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("batch", count), &count, |b, &count| {
            b.iter(|| {
                for i in 0..count {
                    let t = i as f64 / count as f64;
                    let _ = curve.eval(black_box(t));
                }
            })
        });
    }

    group.finish();
}

fn bench_cubic_derivative(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubic_bezier3_derivative");
    let curve = sample_curve();

    group.bench_function("single", |b| {
        b.iter(|| {
            cubic_derivative(
                black_box(curve.p0),
                black_box(curve.p1),
                black_box(curve.p2),
                black_box(curve.p3),
                black_box(0.5),
            )
        })
    });

    group.finish();
}

fn bench_cubic_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubic_bezier3_split");
    let curve = sample_curve();

    group.bench_function("split_at_0.5", |b| b.iter(|| curve.split(black_box(0.5))));
    group.bench_function("split_at_0.25", |b| b.iter(|| curve.split(black_box(0.25))));

    group.finish();
}

fn bench_cubic_to_polyline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubic_bezier3_to_polyline");
    let curve = sample_curve();

    // Tighter tolerance = more points
    for tolerance in [1.0, 0.1, 0.01, 0.001] {
        group.bench_with_input(
            BenchmarkId::new("tolerance", format!("{}", tolerance)),
            &tolerance,
            |b, &tol| b.iter(|| curve.to_polyline(black_box(tol))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cubic_eval,
    bench_cubic_derivative,
    bench_cubic_split,
    bench_cubic_to_polyline,
);
criterion_main!(benches);
