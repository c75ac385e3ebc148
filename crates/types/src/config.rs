use serde::{Deserialize, Serialize};

/// How interior rings (holes) take part in containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HolePolicy {
    /// A point strictly inside a hole is outside the region.
    #[default]
    Honor,
    /// Only exterior rings are tested; holes are treated as filled.
    Ignore,
}
