//! GeoJSON conversion for regions and point features.
//!
//! Conversion is in-memory only: callers hand over GeoJSON text and get
//! [`Region`]s or [`PointFeature`]s back, and can write counted regions out as
//! a FeatureCollection whose `count` and `weight` properties drive a map's
//! fill color.

use crate::error::{PolycountError, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, PolygonType, Value};
use polycount_types::feature::PointFeature;
use polycount_types::region::Region;
use serde_json::Map;

fn parse_features(geojson: &str) -> Result<Vec<Feature>> {
    let parsed: GeoJson = geojson
        .parse()
        .map_err(|e| PolycountError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    match parsed {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(_) => Err(PolycountError::InvalidInput(
            "Expected a Feature or FeatureCollection, got a bare Geometry".to_string(),
        )),
    }
}

fn id_to_string(id: &Id) -> String {
    match id {
        Id::String(s) => s.clone(),
        Id::Number(n) => n.to_string(),
    }
}

/// Picks a feature's identifier: the feature `id`, then the named property,
/// then the feature's position in the collection.
fn feature_id(feature: &Feature, id_property: Option<&str>, idx: usize) -> String {
    if let Some(id) = &feature.id {
        return id_to_string(id);
    }

    if let Some(name) = id_property
        && let Some(value) = feature.properties.as_ref().and_then(|p| p.get(name))
    {
        return match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    idx.to_string()
}

fn coord_from_position(position: &[f64]) -> Result<Coord> {
    if position.len() < 2 {
        return Err(PolycountError::InvalidInput(
            "Coordinate must have at least 2 values".to_string(),
        ));
    }
    Ok(Coord {
        x: position[0],
        y: position[1],
    })
}

fn ring_from_positions(ring: &[Vec<f64>]) -> Result<LineString> {
    let coords = ring
        .iter()
        .map(|p| coord_from_position(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::from(coords))
}

/// Builds a polygon from GeoJSON rings. An empty ring list yields a polygon
/// with an empty exterior, which the aggregator reports as invalid.
fn polygon_from_rings(rings: &PolygonType) -> Result<Polygon> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => ring_from_positions(ring)?,
        None => LineString::new(vec![]),
    };
    let interiors = rings
        .map(|r| ring_from_positions(r))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn multi_polygon_from_value(value: &Value) -> Result<MultiPolygon> {
    match value {
        Value::Polygon(rings) if rings.is_empty() => Ok(MultiPolygon::new(vec![])),
        Value::Polygon(rings) => Ok(MultiPolygon::new(vec![polygon_from_rings(rings)?])),
        Value::MultiPolygon(polygons) => Ok(MultiPolygon::new(
            polygons
                .iter()
                .filter(|rings| !rings.is_empty())
                .map(polygon_from_rings)
                .collect::<Result<Vec<_>>>()?,
        )),
        other => Err(PolycountError::InvalidInput(format!(
            "Region geometry must be Polygon or MultiPolygon, got {}",
            geometry_kind(other)
        ))),
    }
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        _ => "GeometryCollection",
    }
}

fn positions_from_ring(ring: &LineString) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn rings_from_polygon(polygon: &Polygon) -> PolygonType {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(positions_from_ring)
        .collect()
}

/// Parses regions from a GeoJSON FeatureCollection (or single Feature).
///
/// Identifiers come from the feature `id`, falling back to the feature's
/// index in the collection. See [`regions_from_geojson_with_id_property`] to
/// use a property such as a ZIP code instead.
///
/// # Examples
///
/// ```
/// use polycount::geojson::regions_from_geojson;
///
/// let json = r#"{
///   "type": "FeatureCollection",
///   "features": [{
///     "type": "Feature",
///     "id": "19104",
///     "properties": {"name": "University City"},
///     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}
///   }]
/// }"#;
///
/// let regions = regions_from_geojson(json)?;
/// assert_eq!(regions[0].id, "19104");
/// assert_eq!(regions[0].properties["name"], "University City");
/// # Ok::<(), polycount::PolycountError>(())
/// ```
pub fn regions_from_geojson(geojson: &str) -> Result<Vec<Region>> {
    regions_from_features(parse_features(geojson)?, None)
}

/// Like [`regions_from_geojson`], but features without an `id` take their
/// identifier from the property `id_property`.
pub fn regions_from_geojson_with_id_property(
    geojson: &str,
    id_property: &str,
) -> Result<Vec<Region>> {
    regions_from_features(parse_features(geojson)?, Some(id_property))
}

fn regions_from_features(features: Vec<Feature>, id_property: Option<&str>) -> Result<Vec<Region>> {
    features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let id = feature_id(&feature, id_property, idx);
            let geometry = match &feature.geometry {
                Some(geom) => multi_polygon_from_value(&geom.value).map_err(|e| {
                    PolycountError::InvalidInput(format!("Feature {} ({}): {}", idx, id, e))
                })?,
                // Null geometry is legal GeoJSON; it becomes a region with no rings.
                None => MultiPolygon::new(vec![]),
            };

            Ok(Region::new(id, geometry).with_properties(feature.properties.unwrap_or_default()))
        })
        .collect()
}

/// Parses point features from a GeoJSON FeatureCollection of Points.
///
/// A numeric `weight` property, when present, becomes the feature's weight.
pub fn points_from_geojson(geojson: &str, id_property: Option<&str>) -> Result<Vec<PointFeature>> {
    parse_features(geojson)?
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let id = feature_id(&feature, id_property, idx);
            let position = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Point(position)) => position,
                Some(other) => {
                    return Err(PolycountError::InvalidInput(format!(
                        "Feature {} ({}): expected Point geometry, got {}",
                        idx,
                        id,
                        geometry_kind(other)
                    )));
                }
                None => {
                    return Err(PolycountError::InvalidInput(format!(
                        "Feature {} ({}): missing geometry",
                        idx, id
                    )));
                }
            };

            let coord = coord_from_position(position)?;
            let mut point = PointFeature::from_lon_lat(id, coord.x, coord.y);
            if let Some(weight) = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("weight"))
                .and_then(|w| w.as_f64())
            {
                point = point.with_weight(weight);
            }
            Ok(point)
        })
        .collect()
}

/// Converts regions to a GeoJSON FeatureCollection with their counts.
///
/// Each feature keeps the region's properties and gains `count` and
/// `weight`, overwriting properties of the same name.
pub fn regions_to_geojson(regions: &[Region]) -> Result<String> {
    let features: Vec<Feature> = regions
        .iter()
        .map(|region| {
            let mut props: Map<String, serde_json::Value> = region.properties.clone();
            props.insert("count".to_string(), region.count.into());
            props.insert("weight".to_string(), region.weight.into());

            let polygons = region.polygons().iter().map(rings_from_polygon).collect();

            Feature {
                bbox: region.bbox().map(|b| b.to_array().to_vec()),
                geometry: Some(Geometry::new(Value::MultiPolygon(polygons))),
                id: Some(Id::String(region.id.clone())),
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    serde_json::to_string(&collection).map_err(|e| {
        PolycountError::SerializationErrorWithContext(format!(
            "Failed to serialize feature collection: {}",
            e
        ))
    })
}
