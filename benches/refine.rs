use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use darboux::{compute_sums, equidistant, insert_point, Function};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_step(c: &mut Criterion) {
    let f = Function::ExpSinPlusSquare;
    let mut group = c.benchmark_group("refinement_step");
    for &n in &[10usize, 100, 1000] {
        let (points, details) = compute_sums(equidistant(0., 2., n), &f);

        group.bench_with_input(BenchmarkId::new("insert_point", n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let r = insert_point(points.clone(), &f, &details, &mut rng).unwrap();
                black_box(r);
            })
        });

        group.bench_with_input(BenchmarkId::new("compute_sums", n), &n, |b, &n| {
            b.iter(|| {
                let r = compute_sums(equidistant(0., 2., n + 1), &f);
                black_box(r);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
