//! # polycount-types
//!
//! Data types shared by the polycount spatial aggregator.
//!
//! - **Points**: [`PointFeature`](feature::PointFeature), a named longitude/latitude position
//! - **Regions**: [`Region`](region::Region), a named polygon or multi-polygon with a count slot
//! - **Bounding boxes**: [`BoundingBox2D`](bbox::BoundingBox2D), the index query key
//! - **Run statistics**: [`AggregateStats`](stats::AggregateStats)
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Coordinates follow the GeoJSON convention: x is
//! longitude, y is latitude.
//!
//! ## Examples
//!
//! ```rust
//! use polycount_types::bbox::BoundingBox2D;
//! use polycount_types::feature::PointFeature;
//!
//! let stop = PointFeature::new("30th St Station", 39.9557, -75.1820);
//!
//! let center_city = BoundingBox2D::new(-75.1900, 39.9400, -75.1400, 39.9600);
//! assert!(center_city.contains_point(&stop.location));
//! ```

pub mod bbox;
pub mod config;
pub mod feature;
pub mod region;
pub mod stats;
