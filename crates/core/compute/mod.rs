//! Containment algorithms, the packed index, validation, and GeoJSON conversion.

pub mod geojson;
pub mod spatial;
pub mod validation;
