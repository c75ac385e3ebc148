//! Aggregator builder for flexible configuration
//!
//! This module provides a builder pattern for creating aggregators from a
//! base configuration plus individual overrides.

use crate::aggregate::Aggregator;
use crate::config::{Config, HolePolicy};
use crate::error::Result;

/// Builder for an [`Aggregator`] with custom index and containment settings.
#[derive(Debug, Default)]
pub struct AggregatorBuilder {
    config: Config,
}

impl AggregatorBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Maximum children per index node.
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_node_capacity(capacity);
        self
    }

    pub fn hole_policy(mut self, policy: HolePolicy) -> Self {
        self.config = self.config.with_hole_policy(policy);
        self
    }

    pub fn min_ring_vertices(mut self, vertices: usize) -> Self {
        self.config = self.config.with_min_ring_vertices(vertices);
        self
    }

    /// Validate the configuration and build the aggregator.
    pub fn build(self) -> Result<Aggregator> {
        Aggregator::with_config(self.config)
    }
}
