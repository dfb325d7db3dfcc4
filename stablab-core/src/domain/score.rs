//! NormalizedScore — the per-metric output of the normalization stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a metric's natural direction is good-when-high or good-when-low.
///
/// Direction correction runs after the raw transform so that a higher score
/// always means more stable, whatever the metric measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsStable,
    LowerIsStable,
}

impl Direction {
    /// Apply the direction correction to a 0–100 score.
    pub fn apply(self, score: f64) -> f64 {
        match self {
            Direction::HigherIsStable => score,
            Direction::LowerIsStable => 100.0 - score,
        }
    }
}

/// Whether a metric produced a valid score this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Active,
    Missing,
}

/// One metric's normalized 0–100 stability score.
///
/// `score` is `Some` exactly when `status == Active`. A missing metric never
/// carries a degraded score — downstream must not read a number out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedScore {
    pub metric_id: String,
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub direction: Direction,
    pub status: ScoreStatus,
}

impl NormalizedScore {
    pub fn active(metric_id: impl Into<String>, date: NaiveDate, score: f64, direction: Direction) -> Self {
        Self {
            metric_id: metric_id.into(),
            date,
            score: Some(score),
            direction,
            status: ScoreStatus::Active,
        }
    }

    pub fn missing(metric_id: impl Into<String>, date: NaiveDate, direction: Direction) -> Self {
        Self {
            metric_id: metric_id.into(),
            date,
            score: None,
            direction,
            status: ScoreStatus::Missing,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ScoreStatus::Active
    }
}
