use crate::bbox::BoundingBox2D;
use geo::Point;
use serde::{Deserialize, Serialize};

/// A named geographic point, such as a bus stop or a bike-share station.
///
/// The location is stored as a `geo::Point` with x = longitude and
/// y = latitude. Each feature also carries a weight, `1.0` unless set, which
/// the aggregator sums per region next to the plain count.
///
/// # Examples
///
/// ```
/// use polycount_types::feature::PointFeature;
///
/// let station = PointFeature::new("City Hall", 39.9524, -75.1636).with_weight(42.0);
/// assert_eq!(station.lat(), 39.9524);
/// assert_eq!(station.lon(), -75.1636);
/// assert_eq!(station.weight, 42.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    pub id: String,
    pub location: Point,
    #[serde(default = "PointFeature::default_weight")]
    pub weight: f64,
}

impl PointFeature {
    /// Create a feature from latitude and longitude, in that order.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::from_lon_lat(id, lon, lat)
    }

    /// Create a feature from GeoJSON-ordered coordinates.
    pub fn from_lon_lat(id: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            location: Point::new(lon, lat),
            weight: Self::default_weight(),
        }
    }

    /// Create a feature from coordinate text as found in delimited files.
    ///
    /// Text that does not parse as a number becomes NaN, which the aggregator
    /// reports as an invalid point instead of failing the whole load.
    ///
    /// ```
    /// use polycount_types::feature::PointFeature;
    ///
    /// let ok = PointFeature::from_text("a", " 39.95 ", "-75.16");
    /// assert_eq!(ok.lat(), 39.95);
    ///
    /// let bad = PointFeature::from_text("b", "", "-75.16");
    /// assert!(bad.lat().is_nan());
    /// ```
    pub fn from_text(id: impl Into<String>, lat: &str, lon: &str) -> Self {
        let parse = |s: &str| s.trim().parse::<f64>().unwrap_or(f64::NAN);
        Self::new(id, parse(lat), parse(lon))
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.location.x()
    }

    /// The zero-area box this feature occupies in the spatial index.
    pub fn bbox(&self) -> BoundingBox2D {
        BoundingBox2D::from_point(&self.location)
    }

    const fn default_weight() -> f64 {
        1.0
    }
}
