use crate::bbox::BoundingBox2D;
use geo::{MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named polygon or multi-polygon boundary, such as a ZIP code area.
///
/// `count` and `weight` are outputs: the aggregator resets and writes them
/// exactly once per run. `properties` is carried through untouched so the
/// region can be written back out as a GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub geometry: MultiPolygon<f64>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub weight: f64,
}

impl Region {
    /// Create a region with a zero count.
    ///
    /// Accepts a single `Polygon` as well as a `MultiPolygon`.
    ///
    /// # Examples
    ///
    /// ```
    /// use polycount_types::region::Region;
    /// use geo::polygon;
    ///
    /// let square = Region::new("19104", polygon![
    ///     (x: 0.0, y: 0.0),
    ///     (x: 1.0, y: 0.0),
    ///     (x: 1.0, y: 1.0),
    ///     (x: 0.0, y: 1.0),
    /// ]);
    /// assert_eq!(square.count, 0);
    /// assert_eq!(square.ring_count(), 1);
    /// ```
    pub fn new(id: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            properties: Map::new(),
            count: 0,
            weight: 0.0,
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.geometry.0
    }

    /// Number of rings (exterior and interior) across all member polygons.
    ///
    /// A polygon whose exterior ring has no coordinates contributes nothing.
    pub fn ring_count(&self) -> usize {
        self.polygons()
            .iter()
            .filter(|p| !p.exterior().0.is_empty())
            .map(|p| 1 + p.interiors().len())
            .sum()
    }

    /// Bounding box over every vertex of every ring.
    pub fn bbox(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_coords(self.polygons().iter().flat_map(|p| {
            p.exterior()
                .coords()
                .chain(p.interiors().iter().flat_map(|r| r.coords()))
                .copied()
        }))
    }

    /// Clear the outputs of a previous run.
    pub fn reset(&mut self) {
        self.count = 0;
        self.weight = 0.0;
    }
}
