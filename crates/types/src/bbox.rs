use geo::{Coord, Point, Rect};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// Represents a rectangular area defined by minimum and maximum coordinates.
/// This is a wrapper around `geo::Rect`; all comparisons treat the box as a
/// closed interval, so a point lying on an edge is inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Arguments
    ///
    /// * `min_x` - Minimum longitude/x coordinate
    /// * `min_y` - Minimum latitude/y coordinate
    /// * `max_x` - Maximum longitude/x coordinate
    /// * `max_y` - Maximum latitude/y coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use polycount_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(-75.28, 39.87, -74.96, 40.14);
    /// assert_eq!(bbox.min_x(), -75.28);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// The zero-area box sitting exactly on `point`.
    pub fn from_point(point: &Point) -> Self {
        Self::new(point.x(), point.y(), point.x(), point.y())
    }

    /// Smallest box covering every coordinate, or `None` for an empty iterator.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut coords = coords.into_iter();
        let first = coords.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for c in coords {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }

        Some(Self::new(min_x, min_y, max_x, max_y))
    }

    /// Get the minimum x coordinate.
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    /// Get the minimum y coordinate.
    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    /// Get the maximum x coordinate.
    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    /// Get the maximum y coordinate.
    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        )
    }

    /// Check if a point is contained within this bounding box.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// Check if this bounding box intersects with another.
    ///
    /// Touching edges count as an intersection.
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y())
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox2D) -> Self {
        Self::new(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// As `[min_x, min_y, max_x, max_y]`, the GeoJSON `bbox` layout.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x(), self.min_y(), self.max_x(), self.max_y()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_2d_creation() {
        let bbox = BoundingBox2D::new(-75.2, 39.9, -75.1, 40.0);
        assert_eq!(bbox.min_x(), -75.2);
        assert_eq!(bbox.min_y(), 39.9);
        assert_eq!(bbox.max_x(), -75.1);
        assert_eq!(bbox.max_y(), 40.0);
    }

    #[test]
    fn test_bbox_2d_contains_edges() {
        let bbox = BoundingBox2D::new(0.0, 0.0, 1.0, 1.0);

        assert!(bbox.contains_point(&Point::new(0.5, 0.5)));
        assert!(bbox.contains_point(&Point::new(0.0, 0.0)));
        assert!(bbox.contains_point(&Point::new(1.0, 0.5)));
        assert!(!bbox.contains_point(&Point::new(1.0001, 0.5)));
    }

    #[test]
    fn test_bbox_2d_intersects() {
        let bbox1 = BoundingBox2D::new(0.0, 0.0, 2.0, 2.0);
        let bbox2 = BoundingBox2D::new(1.0, 1.0, 3.0, 3.0);
        let bbox3 = BoundingBox2D::new(5.0, 5.0, 6.0, 6.0);
        let touching = BoundingBox2D::new(2.0, 0.0, 4.0, 2.0);

        assert!(bbox1.intersects(&bbox2));
        assert!(bbox1.intersects(&touching));
        assert!(!bbox1.intersects(&bbox3));
    }

    #[test]
    fn test_zero_area_box_intersects_container() {
        let point_box = BoundingBox2D::from_point(&Point::new(1.0, 1.0));
        assert_eq!(point_box.min_x(), point_box.max_x());
        assert_eq!(point_box.min_y(), point_box.max_y());
        assert!(point_box.intersects(&BoundingBox2D::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_from_coords_and_union() {
        let bbox = BoundingBox2D::from_coords(vec![
            geo::coord! { x: 3.0, y: -1.0 },
            geo::coord! { x: -2.0, y: 4.0 },
            geo::coord! { x: 0.0, y: 0.0 },
        ])
        .unwrap();
        assert_eq!(bbox.to_array(), [-2.0, -1.0, 3.0, 4.0]);

        assert!(BoundingBox2D::from_coords(Vec::<Coord>::new()).is_none());

        let merged = bbox.union(&BoundingBox2D::new(10.0, 10.0, 11.0, 11.0));
        assert_eq!(merged.to_array(), [-2.0, -1.0, 11.0, 11.0]);
        assert_eq!(merged.center(), Point::new(4.5, 5.0));
    }
}
