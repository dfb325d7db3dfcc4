//! Composite aggregation — weighted mean of active scores, gated by
//! completeness.
//!
//! Pure and side-effect-free. The staleness mechanism is caller-supplied:
//! because the engine keeps no state between invocations, the previous valid
//! result is threaded in by the orchestrator and handed back flagged stale
//! when the gate closes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ComponentWeight, CompositeResult, InsufficientReason, NormalizedScore, StabilityValue,
};
use crate::regime::{signal_light, SignalLightThresholds};
use crate::weights::{ActiveSet, WeightError};

/// Aggregation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeParams {
    /// Minimum `active_count / total_count` for a fresh score (commonly 0.70).
    pub completeness_floor: f64,
    #[serde(default)]
    pub signal_light: SignalLightThresholds,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            completeness_floor: 0.70,
            signal_light: SignalLightThresholds::default(),
        }
    }
}

/// Aggregate active scores into a `CompositeResult`.
///
/// `stability_score = Σ(score_i * redistributed_weight_i) / Σ(weight_i)` over
/// the active set. Below the completeness floor the last valid result (if
/// supplied) is retained with a staleness flag; missing components are never
/// zero-filled.
pub fn aggregate(
    date: NaiveDate,
    scores: &[NormalizedScore],
    components: &[ComponentWeight],
    params: &CompositeParams,
    previous: Option<&CompositeResult>,
) -> CompositeResult {
    let active = match ActiveSet::resolve(components, scores) {
        Ok(set) => set,
        Err(err) => {
            let reason = match err {
                WeightError::RequiredComponentMissing(_) => {
                    InsufficientReason::RequiredComponentMissing
                }
                WeightError::NoActiveComponents => InsufficientReason::NoActiveComponents,
            };
            return insufficient(date, components.len(), reason);
        }
    };

    let completeness = active.completeness_pct();
    if completeness < params.completeness_floor {
        return gated(date, &active, previous);
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for s in scores.iter().filter(|s| s.is_active()) {
        if let (Some(score), Some(weight)) = (s.score, active.weight(&s.metric_id)) {
            weighted_sum += score * weight;
            weight_sum += weight;
        }
    }

    if weight_sum <= 0.0 {
        return insufficient(date, active.total_count(), InsufficientReason::NoActiveComponents);
    }

    let score = (weighted_sum / weight_sum).clamp(0.0, 100.0);
    CompositeResult {
        date,
        stability: StabilityValue::Valid { score },
        completeness_pct: completeness,
        active_count: active.active_count(),
        total_count: active.total_count(),
        regime: Some(signal_light::classify(score, &params.signal_light)),
    }
}

fn insufficient(date: NaiveDate, total_count: usize, reason: InsufficientReason) -> CompositeResult {
    CompositeResult {
        date,
        stability: StabilityValue::Insufficient { reason },
        completeness_pct: 0.0,
        active_count: 0,
        total_count,
        regime: None,
    }
}

/// Completeness gate closed: hold the previous valid score as stale, or
/// report insufficiency when there is nothing to hold.
fn gated(date: NaiveDate, active: &ActiveSet, previous: Option<&CompositeResult>) -> CompositeResult {
    let held = previous.and_then(|p| {
        let score = p.stability.score()?;
        let as_of = p.stability.valid_as_of(p.date)?;
        Some((score, as_of, p.regime))
    });
    let (stability, regime) = match held {
        Some((score, as_of, regime)) => (StabilityValue::Stale { score, as_of }, regime),
        None => (
            StabilityValue::Insufficient { reason: InsufficientReason::BelowCompletenessFloor },
            None,
        ),
    };
    CompositeResult {
        date,
        stability,
        completeness_pct: active.completeness_pct(),
        active_count: active.active_count(),
        total_count: active.total_count(),
        regime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::regime::SignalLight;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn active(id: &str, score: f64) -> NormalizedScore {
        NormalizedScore::active(id, date(), score, Direction::HigherIsStable)
    }

    fn missing(id: &str) -> NormalizedScore {
        NormalizedScore::missing(id, date(), Direction::HigherIsStable)
    }

    /// Ten metrics, ΣW = 14.6, weighted composite ≈ 49.1,
    /// classified Yellow.
    #[test]
    fn ten_metric_composite_is_yellow() {
        let weights = [1.5, 1.4, 1.3, 1.6, 1.2, 1.4, 1.8, 1.6, 1.7, 1.6];
        let scores_raw = [30.0, 52.0, 47.0, 6.0, 100.0, 92.0, 75.0, 41.0, 27.0, 21.0];
        let components: Vec<ComponentWeight> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| ComponentWeight::new(format!("m{i}"), w, "macro"))
            .collect();
        let scores: Vec<NormalizedScore> = scores_raw
            .iter()
            .enumerate()
            .map(|(i, &s)| active(&format!("m{i}"), s))
            .collect();

        let result = aggregate(date(), &scores, &components, &CompositeParams::default(), None);
        let score = result.stability.score().unwrap();
        assert!((score - 49.13698630136986).abs() < 1e-9, "got {score}");
        assert_eq!(result.regime, Some(SignalLight::Yellow));
        assert_eq!(result.completeness_pct, 1.0);
    }

    /// 18 components, 10 active (55.6%) with a 70% floor —
    /// composite withheld, explicit insufficiency, never a number.
    #[test]
    fn below_floor_without_previous_is_insufficient() {
        let components: Vec<ComponentWeight> =
            (0..18).map(|i| ComponentWeight::new(format!("m{i}"), 1.0, "macro")).collect();
        let scores: Vec<NormalizedScore> = (0..18)
            .map(|i| if i < 10 { active(&format!("m{i}"), 60.0) } else { missing(&format!("m{i}")) })
            .collect();

        let result = aggregate(date(), &scores, &components, &CompositeParams::default(), None);
        assert_eq!(result.stability.score(), None);
        assert_eq!(
            result.stability,
            StabilityValue::Insufficient { reason: InsufficientReason::BelowCompletenessFloor }
        );
        assert!((result.completeness_pct - 10.0 / 18.0).abs() < 1e-12);
        assert_eq!(result.active_count, 10);
        assert_eq!(result.total_count, 18);
    }

    #[test]
    fn below_floor_with_previous_holds_stale() {
        let components: Vec<ComponentWeight> =
            (0..10).map(|i| ComponentWeight::new(format!("m{i}"), 1.0, "macro")).collect();
        let scores: Vec<NormalizedScore> = (0..10)
            .map(|i| if i < 3 { active(&format!("m{i}"), 60.0) } else { missing(&format!("m{i}")) })
            .collect();
        let prev_date = NaiveDate::from_ymd_opt(2024, 5, 27).unwrap();
        let previous = CompositeResult {
            date: prev_date,
            stability: StabilityValue::Valid { score: 58.0 },
            completeness_pct: 1.0,
            active_count: 10,
            total_count: 10,
            regime: Some(SignalLight::Yellow),
        };

        let result =
            aggregate(date(), &scores, &components, &CompositeParams::default(), Some(&previous));
        assert_eq!(result.stability, StabilityValue::Stale { score: 58.0, as_of: prev_date });
        assert_eq!(result.regime, Some(SignalLight::Yellow));
    }

    #[test]
    fn chained_staleness_pins_as_of_to_last_valid_date() {
        // Two gated cycles in a row: the held score's as_of must keep
        // pointing at the date it was last valid, not at the previous
        // (already stale) record's date.
        let components: Vec<ComponentWeight> =
            (0..10).map(|i| ComponentWeight::new(format!("m{i}"), 1.0, "macro")).collect();
        let scores: Vec<NormalizedScore> = (0..10)
            .map(|i| if i < 3 { active(&format!("m{i}"), 60.0) } else { missing(&format!("m{i}")) })
            .collect();
        let valid_date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let previous = CompositeResult {
            date: NaiveDate::from_ymd_opt(2024, 5, 27).unwrap(),
            stability: StabilityValue::Stale { score: 58.0, as_of: valid_date },
            completeness_pct: 0.3,
            active_count: 3,
            total_count: 10,
            regime: Some(SignalLight::Yellow),
        };

        let result =
            aggregate(date(), &scores, &components, &CompositeParams::default(), Some(&previous));
        assert_eq!(result.stability, StabilityValue::Stale { score: 58.0, as_of: valid_date });
    }

    #[test]
    fn required_component_missing_suppresses_even_when_complete_enough() {
        let mut components: Vec<ComponentWeight> =
            (0..10).map(|i| ComponentWeight::new(format!("m{i}"), 1.0, "macro")).collect();
        components[0] = ComponentWeight::new("m0", 1.0, "macro").required();
        let scores: Vec<NormalizedScore> = (0..10)
            .map(|i| if i == 0 { missing("m0") } else { active(&format!("m{i}"), 60.0) })
            .collect();

        let result = aggregate(date(), &scores, &components, &CompositeParams::default(), None);
        assert_eq!(
            result.stability,
            StabilityValue::Insufficient { reason: InsufficientReason::RequiredComponentMissing }
        );
    }

    #[test]
    fn all_missing_is_no_active_components() {
        let components = vec![ComponentWeight::new("a", 1.0, "macro")];
        let scores = vec![missing("a")];
        let result = aggregate(date(), &scores, &components, &CompositeParams::default(), None);
        assert_eq!(
            result.stability,
            StabilityValue::Insufficient { reason: InsufficientReason::NoActiveComponents }
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let components: Vec<ComponentWeight> =
            (0..4).map(|i| ComponentWeight::new(format!("m{i}"), 1.0 + i as f64, "macro")).collect();
        let scores: Vec<NormalizedScore> =
            (0..4).map(|i| active(&format!("m{i}"), 20.0 * i as f64)).collect();
        let params = CompositeParams::default();
        let a = aggregate(date(), &scores, &components, &params, None);
        let b = aggregate(date(), &scores, &components, &params, None);
        assert_eq!(a, b);
    }

    #[test]
    fn redistribution_affects_weighting_not_mass() {
        // One missing metric: its weight shifts onto the others, and the
        // composite is the weighted mean of the remaining scores.
        let components = vec![
            ComponentWeight::new("a", 1.0, "macro"),
            ComponentWeight::new("b", 1.0, "macro"),
            ComponentWeight::new("c", 2.0, "macro"),
        ];
        let scores = vec![active("a", 80.0), active("b", 40.0), missing("c")];
        let params = CompositeParams { completeness_floor: 0.5, ..Default::default() };
        let result = aggregate(date(), &scores, &components, &params, None);
        // Weighted mean of 80 and 40 at equal weight = 60.
        assert!((result.stability.score().unwrap() - 60.0).abs() < 1e-12);
    }
}
