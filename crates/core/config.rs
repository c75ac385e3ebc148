//! Aggregator configuration
//!
//! This module provides the run configuration and re-exports the data types
//! from the `polycount-types` crate for convenience.
use serde::de::Error;

pub use polycount_types::bbox::BoundingBox2D;
pub use polycount_types::config::HolePolicy;
pub use polycount_types::feature::PointFeature;
pub use polycount_types::region::Region;
pub use polycount_types::stats::AggregateStats;

/// Aggregation configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum number of children per spatial index node
    #[serde(default = "Config::default_node_capacity")]
    pub node_capacity: usize,

    #[serde(default)]
    pub hole_policy: HolePolicy,

    /// Distinct vertices an exterior ring needs before it is tested
    #[serde(default = "Config::default_min_ring_vertices")]
    pub min_ring_vertices: usize,
}

impl Config {
    const fn default_node_capacity() -> usize {
        16
    }

    const fn default_min_ring_vertices() -> usize {
        3
    }

    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    pub fn with_hole_policy(mut self, policy: HolePolicy) -> Self {
        self.hole_policy = policy;
        self
    }

    pub fn with_min_ring_vertices(mut self, vertices: usize) -> Self {
        self.min_ring_vertices = vertices;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.node_capacity < 2 {
            return Err(format!(
                "Node capacity must be at least 2, got {}",
                self.node_capacity
            ));
        }

        if self.min_ring_vertices < 3 {
            return Err(format!(
                "A ring needs at least 3 vertices, got min_ring_vertices = {}",
                self.min_ring_vertices
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_capacity: Self::default_node_capacity(),
            hole_policy: HolePolicy::default(),
            min_ring_vertices: Self::default_min_ring_vertices(),
        }
    }
}
