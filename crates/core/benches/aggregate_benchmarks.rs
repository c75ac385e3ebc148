use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geo::polygon;
use polycount::{Aggregator, BoundingBox2D, Config, PointFeature, PointIndex, Region};

fn points(n: usize) -> Vec<PointFeature> {
    let side = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|i| {
            // Jitter off the lattice so points rarely sit on region edges.
            let lon = -75.30 + (i % side) as f64 / side as f64 * 0.30 + 1e-7;
            let lat = 39.85 + (i / side) as f64 / side as f64 * 0.20 + 1e-7;
            PointFeature::from_lon_lat(format!("p{}", i), lon, lat)
        })
        .collect()
}

fn regions(per_side: usize) -> Vec<Region> {
    let w = 0.30 / per_side as f64;
    let h = 0.20 / per_side as f64;
    let mut out = Vec::with_capacity(per_side * per_side);
    for row in 0..per_side {
        for col in 0..per_side {
            let x0 = -75.30 + col as f64 * w;
            let y0 = 39.85 + row as f64 * h;
            // Diamond inside each cell, so containment is not just the bbox.
            out.push(Region::new(
                format!("r{}-{}", row, col),
                polygon![
                    (x: x0 + w / 2.0, y: y0),
                    (x: x0 + w, y: y0 + h / 2.0),
                    (x: x0 + w / 2.0, y: y0 + h),
                    (x: x0, y: y0 + h / 2.0),
                ],
            ));
        }
    }
    out
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for n in [1_000, 10_000, 100_000] {
        let pts = points(n);
        group.throughput(Throughput::Elements(n as u64));

        for capacity in [8, 16, 32] {
            group.bench_with_input(
                BenchmarkId::new(format!("capacity_{}", capacity), n),
                &pts,
                |b, pts| {
                    b.iter(|| {
                        let mut diagnostics = Vec::new();
                        PointIndex::build(black_box(pts), capacity, &mut diagnostics).unwrap()
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_index_query(c: &mut Criterion) {
    let pts = points(100_000);
    let mut diagnostics = Vec::new();
    let index = PointIndex::build(&pts, 16, &mut diagnostics).unwrap();

    let mut group = c.benchmark_group("index_query");
    for span in [0.001, 0.01, 0.05] {
        let bbox = BoundingBox2D::new(-75.15, 39.95, -75.15 + span, 39.95 + span);
        group.bench_with_input(BenchmarkId::from_parameter(span), &bbox, |b, bbox| {
            b.iter(|| {
                let mut hits = 0usize;
                index.for_each_candidate(black_box(bbox), |_, _| hits += 1);
                hits
            })
        });
    }
    group.finish();
}

fn bench_indexed_vs_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_points_per_region");
    group.sample_size(20);

    let aggregator = Aggregator::new();
    for (n, per_side) in [(1_000, 5), (10_000, 10), (50_000, 20)] {
        let pts = points(n);
        let base = regions(per_side);
        group.throughput(Throughput::Elements((n * per_side * per_side) as u64));

        group.bench_with_input(BenchmarkId::new("indexed", n), &pts, |b, pts| {
            let mut regs = base.clone();
            b.iter(|| aggregator.run(black_box(pts), &mut regs).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("brute_force", n), &pts, |b, pts| {
            b.iter(|| aggregator.run_brute_force(black_box(pts), &base))
        });
    }

    group.finish();
}

fn bench_hole_policy(c: &mut Criterion) {
    let pts = points(20_000);
    let donut = Region::new(
        "donut",
        polygon!(
            exterior: [(x: -75.28, y: 39.86), (x: -75.02, y: 39.86), (x: -75.02, y: 40.04), (x: -75.28, y: 40.04)],
            interiors: [
                [(x: -75.25, y: 39.88), (x: -75.20, y: 39.88), (x: -75.20, y: 39.93), (x: -75.25, y: 39.93)],
                [(x: -75.10, y: 39.95), (x: -75.05, y: 39.95), (x: -75.05, y: 40.00), (x: -75.10, y: 40.00)],
            ],
        ),
    );

    let mut group = c.benchmark_group("hole_policy");
    for config in [
        Config::default(),
        Config::default().with_hole_policy(polycount::HolePolicy::Ignore),
    ] {
        let aggregator = Aggregator::with_config(config).unwrap();
        let mut regs = vec![donut.clone()];
        group.bench_function(format!("{:?}", aggregator.config().hole_policy), |b| {
            b.iter(|| aggregator.run(black_box(&pts), &mut regs).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_index_build,
    bench_index_query,
    bench_indexed_vs_brute_force,
    bench_hole_policy
);
criterion_main!(benches);
