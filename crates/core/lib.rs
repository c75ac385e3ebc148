//! Counts point features per polygon region, using a packed R-tree to avoid
//! testing every point against every region.
//!
//! ## Features
//! - **Owned spatial index**: Sort-Tile-Recursive packed R-tree over zero-area point boxes
//! - **Exact containment**: ray casting with a fixed boundary rule (edges and vertices are inside)
//! - **Holes**: honored by default, or ignored via [`HolePolicy::Ignore`]
//! - **Recoverable input errors**: bad points and regions become [`Diagnostic`]s, never abort a run
//! - **GeoJSON adapters**: read regions/points from GeoJSON text, write counted regions back
//!
//! ```rust
//! use polycount::{PointFeature, Region, count_points_per_region};
//! use geo::polygon;
//!
//! let stops = vec![
//!     PointFeature::new("Broad & Walnut", 39.9489, -75.1642),
//!     PointFeature::new("Spring Garden", 39.9625, -75.1581),
//!     PointFeature::new("Airport", 39.8744, -75.2424),
//! ];
//! let mut zips = vec![Region::new("19102", polygon![
//!     (x: -75.175, y: 39.945),
//!     (x: -75.155, y: 39.945),
//!     (x: -75.155, y: 39.970),
//!     (x: -75.175, y: 39.970),
//! ])];
//!
//! let report = count_points_per_region(&stops, &mut zips)?;
//! assert_eq!(zips[0].count, 2);
//! assert_eq!(report.count_extent(), Some((2, 2)));
//! # Ok::<(), polycount::PolycountError>(())
//! ```

pub mod aggregate;
pub mod builder;
pub mod compute;
pub mod config;
pub mod error;

pub use aggregate::{
    AggregateReport, Aggregator, Diagnostic, PointIndex, RegionCount, count_points_per_region,
};
pub use builder::AggregatorBuilder;
pub use error::{PolycountError, Result};

pub use config::{AggregateStats, BoundingBox2D, Config, HolePolicy, PointFeature, Region};

// Re-export validation and GeoJSON utilities
pub use compute::geojson;
pub use compute::validation;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Aggregator, AggregatorBuilder, PolycountError, Result};

    pub use crate::{AggregateReport, Diagnostic, count_points_per_region};

    pub use crate::{BoundingBox2D, Config, HolePolicy, PointFeature, Region};

    pub use crate::{geojson, validation};
}
