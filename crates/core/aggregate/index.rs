//! Per-run spatial index over point features.

use crate::compute::spatial::PackedRTree;
use crate::compute::validation::validate_point_feature;
use crate::error::{PolycountError, Result};
use polycount_types::bbox::BoundingBox2D;
use polycount_types::feature::PointFeature;

use super::report::Diagnostic;

/// Packed R-tree over the valid points of one run.
///
/// Borrows the point slice it was built from; entries store the point's
/// position in that slice. Built once, then only queried.
#[derive(Debug)]
pub struct PointIndex<'a> {
    points: &'a [PointFeature],
    tree: PackedRTree<usize>,
}

impl<'a> PointIndex<'a> {
    /// Indexes every valid point as a zero-area box at its (lon, lat).
    ///
    /// Invalid points are left out and reported through `diagnostics`;
    /// only an allocation failure while packing the tree is an error.
    pub fn build(
        points: &'a [PointFeature],
        node_capacity: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(points.len())
            .map_err(|e| PolycountError::IndexBuildFailure(format!("point entries: {}", e)))?;

        for (index, point) in points.iter().enumerate() {
            match validate_point_feature(point) {
                Ok(()) => entries.push((point.bbox(), index)),
                Err(e) => {
                    let diagnostic = Diagnostic::InvalidPoint {
                        index,
                        id: point.id.clone(),
                        reason: e.to_string(),
                    };
                    log::warn!("{}", diagnostic);
                    diagnostics.push(diagnostic);
                }
            }
        }

        let tree = PackedRTree::bulk_load(entries, node_capacity)?;
        log::debug!(
            "Indexed {} of {} points, depth {}",
            tree.len(),
            points.len(),
            tree.depth()
        );

        Ok(Self { points, tree })
    }

    /// Number of indexed (valid) points.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Bounding box of all indexed points.
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        self.tree.bounds()
    }

    /// Calls `visit` with each indexed point whose position lies in `bbox`.
    pub fn for_each_candidate<F>(&self, bbox: &BoundingBox2D, mut visit: F)
    where
        F: FnMut(usize, &'a PointFeature),
    {
        let points = self.points;
        self.tree
            .query_with(bbox, |_, &index| visit(index, &points[index]));
    }

    /// Positions (in the original slice) of the points inside `bbox`, ascending.
    pub fn candidates(&self, bbox: &BoundingBox2D) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_candidate(bbox, |index, _| out.push(index));
        out.sort_unstable();
        out
    }
}
