// Weighted combination of the two point-projection sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weights applied to (primary projection, recent average).
///
/// Deserializes from a two-element array, e.g. `[0.9, 0.1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ScoringBlend {
    pub projection_weight: f64,
    pub average_weight: f64,
}

impl ScoringBlend {
    pub const PRIMARY_ONLY: ScoringBlend = ScoringBlend {
        projection_weight: 1.0,
        average_weight: 0.0,
    };

    pub fn new(projection_weight: f64, average_weight: f64) -> Self {
        ScoringBlend {
            projection_weight,
            average_weight,
        }
    }

    /// True when the average source carries no weight, i.e. the primary
    /// projection is used unmodified.
    pub fn is_primary_only(&self) -> bool {
        self.average_weight == 0.0 && self.projection_weight == 1.0
    }

    /// Blended projection, rounded to one decimal place.
    pub fn apply(&self, projected: f64, average: f64) -> f64 {
        let blended = projected * self.projection_weight + average * self.average_weight;
        (blended * 10.0).round() / 10.0
    }
}

impl From<[f64; 2]> for ScoringBlend {
    fn from(pair: [f64; 2]) -> Self {
        ScoringBlend::new(pair[0], pair[1])
    }
}

impl From<ScoringBlend> for [f64; 2] {
    fn from(blend: ScoringBlend) -> Self {
        [blend.projection_weight, blend.average_weight]
    }
}

impl fmt::Display for ScoringBlend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} proj / {:.2} avg",
            self.projection_weight, self.average_weight
        )
    }
}
