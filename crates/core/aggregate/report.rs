//! Run results: per-region counts, diagnostics and statistics.

use polycount_types::stats::AggregateStats;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// A recoverable problem with one input element.
///
/// Diagnostics never abort a run. The element is excluded (points) or
/// counted as zero (regions) and the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The point had a non-finite or out-of-range coordinate and was not indexed.
    InvalidPoint {
        index: usize,
        id: String,
        reason: String,
    },
    /// The region had no rings or only degenerate ones; its count is 0.
    InvalidRegion {
        index: usize,
        id: String,
        reason: String,
    },
}

impl Diagnostic {
    /// Position of the offending element in its input slice.
    pub fn index(&self) -> usize {
        match self {
            Self::InvalidPoint { index, .. } | Self::InvalidRegion { index, .. } => *index,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoint { index, id, reason } => {
                write!(f, "Skipping point {} ({:?}): {}", index, id, reason)
            }
            Self::InvalidRegion { index, id, reason } => {
                write!(f, "Region {} ({:?}) counted as 0: {}", index, id, reason)
            }
        }
    }
}

/// Count for one input region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    /// Position of the region in the input slice
    pub index: usize,
    pub id: String,
    pub count: u64,
    /// Sum of the weights of the contained points
    pub weight: f64,
}

/// Everything a run produced besides the counts written onto the regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// One entry per input region, in input order.
    pub counts: Vec<RegionCount>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: AggregateStats,
}

impl AggregateReport {
    /// Count of the first region with identifier `id`.
    pub fn count_for(&self, id: &str) -> Option<u64> {
        self.counts.iter().find(|c| c.id == id).map(|c| c.count)
    }

    /// Identifier to count mapping.
    ///
    /// Regions sharing an identifier have their counts added together.
    pub fn counts_by_id(&self) -> FxHashMap<&str, u64> {
        let mut map = FxHashMap::default();
        for c in &self.counts {
            *map.entry(c.id.as_str()).or_insert(0) += c.count;
        }
        map
    }

    /// Smallest and largest count, the domain of a sequential color scale.
    pub fn count_extent(&self) -> Option<(u64, u64)> {
        let mut counts = self.counts.iter().map(|c| c.count);
        let first = counts.next()?;
        Some(counts.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
    }

    /// Sum of all region counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// True when no diagnostics were recorded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn invalid_points(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::InvalidPoint { .. }))
    }

    pub fn invalid_regions(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::InvalidRegion { .. }))
    }
}
