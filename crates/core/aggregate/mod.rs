//! Point-in-region aggregation.
//!
//! A run has two phases. First every valid point goes into a [`PointIndex`]
//! (a packed R-tree of zero-area boxes). Then each region computes its
//! bounding box, asks the index for the points inside that box, and runs the
//! exact containment test on those candidates only. The box query never
//! drops a point that is truly inside, so the count equals what a test of
//! every point against every region would give.
//!
//! Counts do not depend on the order of points or regions. Weights are
//! summed in index order, so they are exact for integral weights and may
//! differ in the last bits for fractional ones when the input is permuted.

mod index;
mod report;

pub use index::PointIndex;
pub use report::{AggregateReport, Diagnostic, RegionCount};

use crate::builder::AggregatorBuilder;
use crate::compute::spatial::{merge_bboxes, point_in_polygon, polygon_bbox};
use crate::compute::validation::validate_region;
use crate::config::Config;
use crate::error::{PolycountError, Result};
use geo::Polygon;
use polycount_types::bbox::BoundingBox2D;
use polycount_types::feature::PointFeature;
use polycount_types::region::Region;
use polycount_types::stats::AggregateStats;

/// A validated region: its member polygons and their merged bounding box.
struct PreparedRegion<'r> {
    polygons: &'r [Polygon],
    bbox: BoundingBox2D,
}

impl<'r> PreparedRegion<'r> {
    fn new(region: &'r Region, config: &Config) -> Result<Self> {
        validate_region(region, config.min_ring_vertices)?;

        let polygons = region.polygons();
        let boxes: Vec<BoundingBox2D> = polygons.iter().filter_map(polygon_bbox).collect();
        let bbox = merge_bboxes(&boxes).ok_or_else(|| {
            PolycountError::InvalidInput("Region has no usable exterior ring".to_string())
        })?;

        Ok(Self { polygons, bbox })
    }

    fn contains(&self, point: &PointFeature, config: &Config) -> bool {
        let p = point.location.0;
        self.polygons
            .iter()
            .any(|polygon| point_in_polygon(polygon, p, config.hole_policy))
    }
}

/// Counts point features per region.
///
/// Holds only configuration; every [`run`](Aggregator::run) builds its own
/// index, so one aggregator can serve many runs, including concurrent ones
/// on separate threads.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: Config,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(PolycountError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the spatial index for `points`, recording invalid ones in
    /// `diagnostics`.
    pub fn build_index<'a>(
        &self,
        points: &'a [PointFeature],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<PointIndex<'a>> {
        PointIndex::build(points, self.config.node_capacity, diagnostics)
    }

    /// Counts the points inside each region.
    ///
    /// Each region's `count` and `weight` are reset and written once. The
    /// report lists one [`RegionCount`] per region in input order, plus any
    /// diagnostics for points or regions that had to be skipped.
    ///
    /// # Errors
    ///
    /// Only [`PolycountError::IndexBuildFailure`] is returned; malformed
    /// points and regions are recorded as diagnostics instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use polycount::{Aggregator, PointFeature, Region};
    /// use geo::polygon;
    ///
    /// let points = vec![
    ///     PointFeature::new("inside", 0.5, 0.5),
    ///     PointFeature::new("outside", 2.0, 2.0),
    /// ];
    /// let mut regions = vec![Region::new("square", polygon![
    ///     (x: 0.0, y: 0.0),
    ///     (x: 1.0, y: 0.0),
    ///     (x: 1.0, y: 1.0),
    ///     (x: 0.0, y: 1.0),
    /// ])];
    ///
    /// let report = Aggregator::new().run(&points, &mut regions)?;
    /// assert_eq!(regions[0].count, 1);
    /// assert_eq!(report.count_for("square"), Some(1));
    /// assert!(report.is_clean());
    /// # Ok::<(), polycount::PolycountError>(())
    /// ```
    pub fn run(&self, points: &[PointFeature], regions: &mut [Region]) -> Result<AggregateReport> {
        let mut diagnostics = Vec::new();
        let mut stats = AggregateStats::new(points.len(), regions.len());

        let index = self.build_index(points, &mut diagnostics)?;
        stats.points_indexed = index.len();
        stats.points_skipped = points.len() - index.len();
        stats.index_depth = index.depth();

        let mut counts = Vec::with_capacity(regions.len());

        for (position, region) in regions.iter_mut().enumerate() {
            region.reset();

            let tally = PreparedRegion::new(region, &self.config).map(|prepared| {
                let (mut examined, mut count, mut weight) = (0u64, 0u64, 0.0);
                index.for_each_candidate(&prepared.bbox, |_, point| {
                    examined += 1;
                    if prepared.contains(point, &self.config) {
                        count += 1;
                        weight += point.weight;
                    }
                });
                (examined, count, weight)
            });

            match tally {
                Ok((examined, count, weight)) => {
                    stats.record_candidates(examined, count);
                    region.count = count;
                    region.weight = weight;
                }
                Err(e) => {
                    let diagnostic = Diagnostic::InvalidRegion {
                        index: position,
                        id: region.id.clone(),
                        reason: e.to_string(),
                    };
                    log::warn!("{}", diagnostic);
                    diagnostics.push(diagnostic);
                    stats.record_invalid_region();
                }
            }

            counts.push(RegionCount {
                index: position,
                id: region.id.clone(),
                count: region.count,
                weight: region.weight,
            });
        }

        log::debug!(
            "Counted {} regions ({} invalid): {} candidates examined, {} inside",
            stats.regions_total,
            stats.regions_invalid,
            stats.candidates_examined,
            stats.containment_hits
        );

        Ok(AggregateReport {
            counts,
            diagnostics,
            stats,
        })
    }

    /// Counts by testing every valid point against every region, without
    /// the index. Returns one count per region in input order and leaves
    /// the regions untouched.
    ///
    /// Quadratic; meant as a reference for checking and benchmarking
    /// [`run`](Aggregator::run).
    pub fn run_brute_force(&self, points: &[PointFeature], regions: &[Region]) -> Vec<u64> {
        let valid: Vec<&PointFeature> = points
            .iter()
            .filter(|p| crate::compute::validation::validate_point_feature(p).is_ok())
            .collect();

        regions
            .iter()
            .map(|region| match PreparedRegion::new(region, &self.config) {
                Ok(prepared) => valid
                    .iter()
                    .filter(|p| prepared.contains(p, &self.config))
                    .count() as u64,
                Err(_) => 0,
            })
            .collect()
    }
}

/// Counts points per region with the default configuration.
///
/// Shorthand for `Aggregator::new().run(points, regions)`.
pub fn count_points_per_region(
    points: &[PointFeature],
    regions: &mut [Region],
) -> Result<AggregateReport> {
    Aggregator::new().run(points, regions)
}
