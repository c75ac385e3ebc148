//! Exact point-in-polygon tests.
//!
//! Containment rule: a point is inside a polygon when it lies inside or on
//! the boundary of the exterior ring and is not strictly inside any interior
//! ring. A point on a hole's edge therefore belongs to the region, and a point
//! sitting exactly on a vertex is always inside. Edge and vertex hits are
//! detected with an exact collinearity test before ray casting, so the rule
//! does not depend on the direction of the cast ray.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use polycount_types::bbox::BoundingBox2D;
use polycount_types::config::HolePolicy;

/// Where a point lies relative to a single closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingLocation {
    Inside,
    Boundary,
    Outside,
}

/// Segments of a ring, including the closing segment when the ring is
/// stored open.
fn ring_edges(ring: &LineString) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    let coords = &ring.0;
    let closing = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 2 && first != last => Some((*last, *first)),
        _ => None,
    };
    coords
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(closing)
}

fn on_segment(a: Coord, b: Coord, p: Coord) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Locates `p` relative to `ring` by crossing-number ray casting.
///
/// A horizontal ray is cast towards +x; each edge straddling the ray's
/// y (half-open on the upper endpoint) flips the parity.
///
/// # Examples
///
/// ```
/// use polycount::compute::spatial::{locate_in_ring, RingLocation};
/// use geo::{coord, line_string};
///
/// let square = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)];
///
/// assert_eq!(locate_in_ring(&square, coord! { x: 0.5, y: 0.5 }), RingLocation::Inside);
/// assert_eq!(locate_in_ring(&square, coord! { x: 1.0, y: 1.0 }), RingLocation::Boundary);
/// assert_eq!(locate_in_ring(&square, coord! { x: 2.0, y: 2.0 }), RingLocation::Outside);
/// ```
pub fn locate_in_ring(ring: &LineString, p: Coord) -> RingLocation {
    let mut inside = false;

    for (a, b) in ring_edges(ring) {
        if on_segment(a, b, p) {
            return RingLocation::Boundary;
        }

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        RingLocation::Inside
    } else {
        RingLocation::Outside
    }
}

/// Whether `polygon` contains `p` under the module's containment rule.
pub fn point_in_polygon(polygon: &Polygon, p: Coord, holes: HolePolicy) -> bool {
    if locate_in_ring(polygon.exterior(), p) == RingLocation::Outside {
        return false;
    }

    match holes {
        HolePolicy::Ignore => true,
        HolePolicy::Honor => polygon
            .interiors()
            .iter()
            .all(|hole| locate_in_ring(hole, p) != RingLocation::Inside),
    }
}

/// Whether any member polygon of `region` contains `p`.
pub fn point_in_multi_polygon(region: &MultiPolygon, p: Coord, holes: HolePolicy) -> bool {
    region
        .0
        .iter()
        .any(|polygon| point_in_polygon(polygon, p, holes))
}

/// Bounding box of a polygon's exterior ring.
///
/// Interior rings lie within the exterior, so they never widen it.
pub fn polygon_bbox(polygon: &Polygon) -> Option<BoundingBox2D> {
    BoundingBox2D::from_coords(polygon.exterior().coords().copied())
}

/// Merged bounding box of several boxes.
pub fn merge_bboxes<'a, I>(boxes: I) -> Option<BoundingBox2D>
where
    I: IntoIterator<Item = &'a BoundingBox2D>,
{
    boxes
        .into_iter()
        .copied()
        .reduce(|acc, b| acc.union(&b))
}
