use serde::{Deserialize, Serialize};

/// Aggregation run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of point features handed to the run
    pub points_total: usize,
    /// Points that passed validation and went into the index
    pub points_indexed: usize,
    /// Points excluded as invalid
    pub points_skipped: usize,
    /// Number of regions handed to the run
    pub regions_total: usize,
    /// Regions that could not be tested and got a zero count
    pub regions_invalid: usize,
    /// Candidates returned by the index pre-filter, summed over regions
    pub candidates_examined: u64,
    /// Candidates that passed the exact containment test
    pub containment_hits: u64,
    /// Number of levels in the spatial index (0 when empty)
    pub index_depth: usize,
}

impl AggregateStats {
    pub fn new(points_total: usize, regions_total: usize) -> Self {
        Self {
            points_total,
            regions_total,
            ..Self::default()
        }
    }

    pub fn record_candidates(&mut self, examined: u64, hits: u64) {
        self.candidates_examined += examined;
        self.containment_hits += hits;
    }

    pub fn record_invalid_region(&mut self) {
        self.regions_invalid += 1;
    }

    /// Fraction of candidates the exact test rejected; 0.0 when nothing was examined.
    pub fn false_positive_rate(&self) -> f64 {
        if self.candidates_examined == 0 {
            return 0.0;
        }
        (self.candidates_examined - self.containment_hits) as f64 / self.candidates_examined as f64
    }
}
