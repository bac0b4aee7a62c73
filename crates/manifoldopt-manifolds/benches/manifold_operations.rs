//! Benchmarks for manifold operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use manifoldopt_core::component::component;
use manifoldopt_core::manifold::Manifold;
use manifoldopt_manifolds::{Circle, Product, Sphere};
use rand::{rngs::StdRng, SeedableRng};

fn benchmark_sphere_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere");
    let mut rng = StdRng::seed_from_u64(42);

    for &n in &[2, 10, 100, 1000] {
        let sphere = Sphere::new(n).unwrap();
        let x = sphere.random_point(&mut rng);
        let y = sphere.random_point(&mut rng);
        let xi = sphere.random_tangent(&x, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("exp", n), &n, |b, _| {
            b.iter(|| sphere.exp(black_box(&x), black_box(&xi), 0.5).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("log", n), &n, |b, _| {
            b.iter(|| sphere.log(black_box(&x), black_box(&y)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("distance", n), &n, |b, _| {
            b.iter(|| sphere.distance(black_box(&x), black_box(&y)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("parallel_transport", n), &n, |b, _| {
            b.iter(|| {
                sphere
                    .parallel_transport(black_box(&x), black_box(&y), black_box(&xi))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_circle_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle");
    let mut rng = StdRng::seed_from_u64(42);
    let circle = Circle::new();
    let x = circle.random_point(&mut rng);
    let y = circle.random_point(&mut rng);
    let xi = circle.random_tangent(&x, &mut rng).unwrap();

    group.bench_function("exp", |b| {
        b.iter(|| circle.exp(black_box(&x), black_box(&xi), 1.0).unwrap());
    });
    group.bench_function("log", |b| {
        b.iter(|| circle.log(black_box(&x), black_box(&y)).unwrap());
    });
    group.bench_function("distance", |b| {
        b.iter(|| circle.distance(black_box(&x), black_box(&y)).unwrap());
    });

    group.finish();
}

fn benchmark_product_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("product");
    let mut rng = StdRng::seed_from_u64(42);

    for &n in &[2, 100] {
        let product =
            Product::new(vec![component(Sphere::new(n).unwrap()), component(Circle::new())])
                .unwrap();
        let x = product.random_point(&mut rng);
        let y = product.random_point(&mut rng);
        let xi = product.random_tangent(&x, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("exp", n), &n, |b, _| {
            b.iter(|| product.exp(black_box(&x), black_box(&xi), 0.5).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("log", n), &n, |b, _| {
            b.iter(|| product.log(black_box(&x), black_box(&y)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("distance", n), &n, |b, _| {
            b.iter(|| product.distance(black_box(&x), black_box(&y)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sphere_operations,
    benchmark_circle_operations,
    benchmark_product_operations
);
criterion_main!(benches);
