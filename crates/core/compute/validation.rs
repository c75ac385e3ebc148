//! Validation for geographic coordinates, rings and regions.

use crate::error::{PolycountError, Result};
use geo::{LineString, Point};
use polycount_types::feature::PointFeature;
use polycount_types::region::Region;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use polycount::validation::validate_geographic_point;
/// use geo::Point;
///
/// // Valid point
/// let philly = Point::new(-75.1652, 39.9526);
/// assert!(validate_geographic_point(&philly).is_ok());
///
/// // Invalid longitude
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_geographic_point(&invalid).is_err());
///
/// // Invalid latitude
/// let invalid = Point::new(-75.0, 95.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(PolycountError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(PolycountError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(PolycountError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(PolycountError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a point feature's location and weight.
pub fn validate_point_feature(feature: &PointFeature) -> Result<()> {
    validate_geographic_point(&feature.location)?;

    if !feature.weight.is_finite() {
        return Err(PolycountError::InvalidInput(format!(
            "Weight must be finite, got: {}",
            feature.weight
        )));
    }

    Ok(())
}

/// Number of distinct vertices in a ring.
///
/// Consecutive repeats and the closing vertex are not counted, so a closed
/// triangle `a, b, c, a` has 3.
pub fn distinct_vertex_count(ring: &LineString) -> usize {
    let coords = &ring.0;
    let mut count = 0;

    for (i, c) in coords.iter().enumerate() {
        if i > 0 && coords[i - 1] == *c {
            continue;
        }
        count += 1;
    }

    if count > 1 && coords.first() == coords.last() {
        count -= 1;
    }

    count
}

/// Validates that a ring has finite coordinates and enough distinct vertices.
///
/// # Examples
///
/// ```
/// use polycount::validation::validate_ring;
/// use geo::line_string;
///
/// let triangle = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)];
/// assert!(validate_ring(&triangle, 3).is_ok());
///
/// let sliver = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)];
/// assert!(validate_ring(&sliver, 3).is_err());
/// ```
pub fn validate_ring(ring: &LineString, min_vertices: usize) -> Result<()> {
    if let Some((idx, c)) = ring
        .coords()
        .enumerate()
        .find(|(_, c)| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(PolycountError::InvalidInput(format!(
            "Ring vertex at index {} is not finite: ({}, {})",
            idx, c.x, c.y
        )));
    }

    let vertices = distinct_vertex_count(ring);
    if vertices < min_vertices {
        return Err(PolycountError::InvalidInput(format!(
            "Ring has {} distinct vertices, at least {} required",
            vertices, min_vertices
        )));
    }

    Ok(())
}

/// Validates every ring of every member polygon of a region.
///
/// A region is usable only when all of its rings are: one degenerate
/// member or hole makes the whole region invalid, so it is counted as 0
/// and reported rather than partially tested.
///
/// # Examples
///
/// ```
/// use polycount::validation::validate_region;
/// use polycount::Region;
/// use geo::{polygon, MultiPolygon};
///
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
/// let sliver = polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 6.0), (x: 5.0, y: 5.0)];
///
/// assert!(validate_region(&Region::new("ok", square.clone()), 3).is_ok());
///
/// let mixed = Region::new("mixed", MultiPolygon::new(vec![sliver, square]));
/// let err = validate_region(&mixed, 3).unwrap_err();
/// assert!(err.to_string().contains("Polygon 0 exterior"));
/// ```
pub fn validate_region(region: &Region, min_vertices: usize) -> Result<()> {
    if region.polygons().is_empty() {
        return Err(PolycountError::InvalidInput(
            "Region has no rings".to_string(),
        ));
    }

    for (idx, polygon) in region.polygons().iter().enumerate() {
        validate_ring(polygon.exterior(), min_vertices).map_err(|e| {
            PolycountError::InvalidInput(format!("Polygon {} exterior: {}", idx, inner_message(e)))
        })?;

        for (hole, ring) in polygon.interiors().iter().enumerate() {
            validate_ring(ring, min_vertices).map_err(|e| {
                PolycountError::InvalidInput(format!(
                    "Polygon {} hole {}: {}",
                    idx,
                    hole,
                    inner_message(e)
                ))
            })?;
        }
    }

    Ok(())
}

fn inner_message(e: PolycountError) -> String {
    match e {
        PolycountError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}
