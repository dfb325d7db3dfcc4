//! 5-state stress regime — purely banded on the composite stability score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressRegime {
    Calm,
    Normal,
    Elevated,
    High,
    Critical,
}

impl StressRegime {
    /// Whether this regime counts as "under stress" for the projection
    /// engine's regime adjustment.
    pub fn is_stressed(self) -> bool {
        matches!(self, StressRegime::High | StressRegime::Critical)
    }
}

/// Four descending cut points. Calm at or above `calm`, Critical below `high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressThresholds {
    pub calm: f64,
    pub normal: f64,
    pub elevated: f64,
    pub high: f64,
}

impl Default for StressThresholds {
    fn default() -> Self {
        Self { calm: 75.0, normal: 60.0, elevated: 45.0, high: 30.0 }
    }
}

/// Classify a stability score into a stress band. Total: non-finite scores
/// fall through to Critical, the mandatory default branch.
pub fn classify(score: f64, thresholds: &StressThresholds) -> StressRegime {
    if score >= thresholds.calm {
        StressRegime::Calm
    } else if score >= thresholds.normal {
        StressRegime::Normal
    } else if score >= thresholds.elevated {
        StressRegime::Elevated
    } else if score >= thresholds.high {
        StressRegime::High
    } else {
        StressRegime::Critical
    }
}
