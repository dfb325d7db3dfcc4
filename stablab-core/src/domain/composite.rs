//! CompositeResult — the aggregated stability score and its validity state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::regime::SignalLight;

/// Why a composite could not be computed this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    /// Active-weight coverage fell below the configured completeness floor
    /// and no previous valid result was available to hold.
    BelowCompletenessFloor,
    /// A `required` component reported missing.
    RequiredComponentMissing,
    /// No component reported an active score at all.
    NoActiveComponents,
}

/// The stability score in one of three validity states.
///
/// Consumers always receive a renderable answer: a fresh score, a held
/// previous score flagged stale, or an explicit insufficient-data marker.
/// Missing components are never zero-filled or interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StabilityValue {
    Valid { score: f64 },
    Stale { score: f64, as_of: NaiveDate },
    Insufficient { reason: InsufficientReason },
}

impl StabilityValue {
    /// The score, if one exists (fresh or stale).
    pub fn score(&self) -> Option<f64> {
        match self {
            StabilityValue::Valid { score } | StabilityValue::Stale { score, .. } => Some(*score),
            StabilityValue::Insufficient { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StabilityValue::Valid { .. })
    }

    /// The date the score was last actually valid: `record_date` for a fresh
    /// score, the pinned `as_of` for one already held stale. Chained gated
    /// cycles keep pointing at the original valid date.
    pub fn valid_as_of(&self, record_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            StabilityValue::Valid { .. } => Some(record_date),
            StabilityValue::Stale { as_of, .. } => Some(*as_of),
            StabilityValue::Insufficient { .. } => None,
        }
    }
}

/// One evaluation cycle's composite output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub date: NaiveDate,
    pub stability: StabilityValue,
    /// `active_count / total_count`, in [0, 1].
    pub completeness_pct: f64,
    pub active_count: usize,
    pub total_count: usize,
    /// 3-state classification of the stability score. `None` when the
    /// composite is insufficient.
    pub regime: Option<SignalLight>,
}

impl CompositeResult {
    /// The stability score, if one exists this cycle.
    pub fn stability_score(&self) -> Option<f64> {
        self.stability.score()
    }
}
