use geo::{MultiPolygon, polygon};
use polycount::{Aggregator, Config, Diagnostic, HolePolicy, PointFeature, Region};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn scattered_points(n: usize, seed: u64) -> Vec<PointFeature> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let lon = rng.random_range(-75.30..-75.00);
            let lat = rng.random_range(39.85..40.05);
            PointFeature::from_lon_lat(format!("p{}", i), lon, lat)
        })
        .collect()
}

/// A 3x2 grid of adjacent cells covering part of the point extent.
fn grid_regions() -> Vec<Region> {
    let mut regions = Vec::new();
    for row in 0..2 {
        for col in 0..3 {
            let x0 = -75.25 + col as f64 * 0.05;
            let y0 = 39.88 + row as f64 * 0.05;
            regions.push(Region::new(
                format!("cell-{}-{}", row, col),
                polygon![
                    (x: x0, y: y0),
                    (x: x0 + 0.05, y: y0),
                    (x: x0 + 0.05, y: y0 + 0.05),
                    (x: x0, y: y0 + 0.05),
                ],
            ));
        }
    }
    regions
}

fn counts(regions: &[Region]) -> Vec<u64> {
    regions.iter().map(|r| r.count).collect()
}

#[test]
fn test_run_is_idempotent() {
    let points = scattered_points(2_000, 7);
    let mut regions = grid_regions();
    let aggregator = Aggregator::new();

    let first = aggregator.run(&points, &mut regions).unwrap();
    let after_first = counts(&regions);
    let second = aggregator.run(&points, &mut regions).unwrap();

    assert_eq!(counts(&regions), after_first);
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_counts_do_not_depend_on_point_order() {
    let points = scattered_points(1_500, 11);
    let aggregator = Aggregator::new();

    let mut baseline = grid_regions();
    aggregator.run(&points, &mut baseline).unwrap();

    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..8 {
        let mut shuffled = points.clone();
        shuffled.shuffle(&mut rng);

        let mut regions = grid_regions();
        aggregator.run(&shuffled, &mut regions).unwrap();
        assert_eq!(counts(&regions), counts(&baseline));
    }
}

#[test]
fn test_counts_do_not_depend_on_region_order() {
    let points = scattered_points(1_000, 13);
    let aggregator = Aggregator::new();

    let mut baseline = grid_regions();
    aggregator.run(&points, &mut baseline).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..8 {
        let mut shuffled = grid_regions();
        shuffled.shuffle(&mut rng);
        let report = aggregator.run(&points, &mut shuffled).unwrap();

        for region in &baseline {
            assert_eq!(report.count_for(&region.id), Some(region.count));
        }
    }
}

#[test]
fn test_empty_points_give_zero_counts() {
    let mut regions = grid_regions();
    for region in &mut regions {
        region.count = 42;
    }

    let report = Aggregator::new().run(&[], &mut regions).unwrap();
    assert!(regions.iter().all(|r| r.count == 0));
    assert!(report.is_clean());
    assert_eq!(report.total(), 0);
    assert_eq!(report.stats.index_depth, 0);
}

#[test]
fn test_empty_regions() {
    let points = scattered_points(50, 3);
    let mut regions: Vec<Region> = Vec::new();
    let report = Aggregator::new().run(&points, &mut regions).unwrap();
    assert!(report.counts.is_empty());
    assert_eq!(report.count_extent(), None);
    assert_eq!(report.stats.points_indexed, 50);
}

#[test]
fn test_disjoint_interiors_never_exceed_point_total() {
    // Keep points off the shared cell edges so each lands in at most one cell.
    let points: Vec<_> = scattered_points(3_000, 17)
        .into_iter()
        .filter(|p| {
            let fx = ((p.lon() + 75.25) / 0.05).fract().abs();
            let fy = ((p.lat() - 39.88) / 0.05).fract().abs();
            fx > 1e-9 && fy > 1e-9
        })
        .collect();
    let mut regions = grid_regions();
    let report = Aggregator::new().run(&points, &mut regions).unwrap();

    assert!(report.total() <= points.len() as u64);
    assert!(report.total() > 0);
}

#[test]
fn test_overlapping_regions_count_independently() {
    let points = vec![
        PointFeature::from_lon_lat("shared", 1.5, 1.5),
        PointFeature::from_lon_lat("left only", 0.5, 0.5),
        PointFeature::from_lon_lat("right only", 2.5, 2.5),
    ];
    let mut regions = vec![
        Region::new("left", polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]),
        Region::new("right", polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)]),
    ];

    let report = Aggregator::new().run(&points, &mut regions).unwrap();
    assert_eq!(counts(&regions), vec![2, 2]);
    assert_eq!(report.total(), 4);
}

#[test]
fn test_shared_edge_point_counts_for_both_neighbours() {
    let points = vec![PointFeature::from_lon_lat("edge", 1.0, 0.5)];
    let mut regions = vec![
        Region::new("west", polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]),
        Region::new("east", polygon![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0)]),
    ];
    Aggregator::new().run(&points, &mut regions).unwrap();
    assert_eq!(counts(&regions), vec![1, 1]);
}

#[test]
fn test_multi_polygon_counts_point_once() {
    // Two members overlap around (1.5, 1.5).
    let a = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
    let b = polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)];
    let mut regions = vec![Region::new("both", MultiPolygon::new(vec![a, b]))];
    let points = vec![
        PointFeature::from_lon_lat("overlap", 1.5, 1.5),
        PointFeature::from_lon_lat("gap", 2.5, 0.5),
    ];

    Aggregator::new().run(&points, &mut regions).unwrap();
    assert_eq!(regions[0].count, 1);
}

#[test]
fn test_invalid_inputs_become_diagnostics() {
    let points = vec![
        PointFeature::from_lon_lat("good", 0.5, 0.5),
        PointFeature::from_text("blank", "", "0.5"),
        PointFeature::from_text("garbage", "n/a", "0.5"),
        PointFeature::from_lon_lat("infinite", f64::INFINITY, 0.5),
        PointFeature::from_lon_lat("heavy nan", 0.5, 0.5).with_weight(f64::NAN),
    ];
    let mut regions = vec![
        Region::new("sq", polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]),
        Region::new("line", polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
    ];

    let report = Aggregator::new().run(&points, &mut regions).unwrap();

    assert_eq!(counts(&regions), vec![1, 0]);
    let skipped: Vec<usize> = report.invalid_points().map(Diagnostic::index).collect();
    assert_eq!(skipped, vec![1, 2, 3, 4]);
    let bad_regions: Vec<usize> = report.invalid_regions().map(Diagnostic::index).collect();
    assert_eq!(bad_regions, vec![1]);
    assert_eq!(report.stats.points_skipped, 4);
    assert_eq!(report.stats.regions_invalid, 1);
}

#[test]
fn test_index_matches_brute_force_on_concave_regions() {
    let points = scattered_points(2_500, 23);
    let mut regions = vec![
        // A "C" shape opening east, plus a region with a hole.
        Region::new(
            "c-shape",
            polygon![
                (x: -75.25, y: 39.88),
                (x: -75.10, y: 39.88),
                (x: -75.10, y: 39.91),
                (x: -75.20, y: 39.91),
                (x: -75.20, y: 39.95),
                (x: -75.10, y: 39.95),
                (x: -75.10, y: 39.98),
                (x: -75.25, y: 39.98),
            ],
        ),
        Region::new(
            "donut",
            polygon!(
                exterior: [(x: -75.09, y: 39.87), (x: -75.01, y: 39.87), (x: -75.01, y: 39.99), (x: -75.09, y: 39.99)],
                interiors: [[(x: -75.07, y: 39.90), (x: -75.03, y: 39.90), (x: -75.03, y: 39.96), (x: -75.07, y: 39.96)]],
            ),
        ),
    ];

    for policy in [HolePolicy::Honor, HolePolicy::Ignore] {
        for capacity in [2, 4, 16, 64] {
            let aggregator = Aggregator::with_config(
                Config::default()
                    .with_node_capacity(capacity)
                    .with_hole_policy(policy),
            )
            .unwrap();
            let expected = aggregator.run_brute_force(&points, &regions);
            let report = aggregator.run(&points, &mut regions).unwrap();
            assert_eq!(counts(&regions), expected, "policy {:?}, capacity {}", policy, capacity);
            assert!(report.stats.candidates_examined >= report.stats.containment_hits);
        }
    }
}

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Aggregator>();
    assert_send_sync::<polycount::PointIndex<'static>>();
    assert_send_sync::<polycount::AggregateReport>();
    assert_send_sync::<Region>();
    assert_send_sync::<PointFeature>();
}

#[test]
fn test_concurrent_runs_share_one_aggregator() {
    let _ = env_logger::builder().is_test(true).try_init();

    let points = scattered_points(4_000, 29);
    let aggregator = Aggregator::new();
    let expected = aggregator.run_brute_force(&points, &grid_regions());

    let results: Vec<Vec<u64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut regions = grid_regions();
                    aggregator.run(&points, &mut regions).unwrap();
                    counts(&regions)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}
