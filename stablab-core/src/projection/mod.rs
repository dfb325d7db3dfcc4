//! Multi-horizon projection engine.
//!
//! For a fixed entity universe (sectors, metals, ...) and a fixed horizon
//! set, computes per `(entity, horizon)`: trend / relative-strength / risk /
//! regime subscores, a weighted composite, a tie-aware rank, a fixed-band
//! classification, and a display-only uncertainty cone. Everything is
//! recomputed fresh from the supplied history on each invocation.

pub mod envelope;
pub mod rank;
pub mod subscores;

pub use envelope::{build_cones, EnvelopeParams};
pub use rank::{assign_ranks, classify_bands};

use serde::{Deserialize, Serialize};

use crate::domain::EntityId;
use crate::regime::StressRegime;

/// One entity's value history (price or score level, time-ordered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHistory {
    pub entity_id: EntityId,
    /// Static category membership (e.g., "defensive", "cyclical").
    pub category: String,
    pub values: Vec<f64>,
}

/// Fixed subscore weights, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubscoreWeights {
    pub trend: f64,
    pub rel: f64,
    pub risk: f64,
    pub regime: f64,
}

impl Default for SubscoreWeights {
    fn default() -> Self {
        Self { trend: 0.45, rel: 0.30, risk: 0.20, regime: 0.05 }
    }
}

fn default_band() -> usize {
    3
}

/// Static configuration for one projection horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonSpec {
    /// Display label (e.g., "1m", "3m", "12m"). Unique within a run.
    pub label: String,
    /// Observation window in samples for returns, volatility, and drawdown.
    pub period: usize,
    /// Long moving-average window for the trend distance term.
    pub long_ma: usize,
    #[serde(default = "default_band")]
    pub winner_band: usize,
    #[serde(default = "default_band")]
    pub loser_band: usize,
    #[serde(default)]
    pub weights: SubscoreWeights,
}

/// Full projection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Benchmark entity for relative strength. When absent, the universe
    /// average return stands in.
    #[serde(default)]
    pub benchmark: Option<EntityId>,
    /// Categories receiving the stress-regime bonus.
    #[serde(default)]
    pub defensive_categories: Vec<String>,
    #[serde(default)]
    pub envelope: EnvelopeParams,
    pub horizons: Vec<HorizonSpec>,
}

/// Fixed-size classification bands, computed independently per horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Winner,
    Neutral,
    Loser,
}

/// One `(entity, horizon)` projection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntity {
    pub entity_id: EntityId,
    pub horizon: String,
    pub score_trend: f64,
    pub score_rel: f64,
    pub score_risk: f64,
    pub score_regime: f64,
    pub score_total: f64,
    pub rank: usize,
    pub classification: Classification,
}

/// Display-only confidence envelope point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyCone {
    pub entity_id: EntityId,
    pub horizon: String,
    pub center_score: f64,
    pub sigma: f64,
}

/// Output of one projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub entities: Vec<ProjectionEntity>,
    pub cones: Vec<UncertaintyCone>,
}

/// Run the projection engine over the whole universe and horizon set.
pub fn project(
    universe: &[EntityHistory],
    params: &ProjectionParams,
    stress: StressRegime,
) -> Projection {
    let mut entities = Vec::with_capacity(universe.len() * params.horizons.len());
    for spec in &params.horizons {
        entities.extend(project_horizon(universe, spec, params, stress));
    }
    let horizon_order: Vec<String> = params.horizons.iter().map(|h| h.label.clone()).collect();
    let cones = build_cones(&entities, &horizon_order, &params.envelope);
    Projection { entities, cones }
}

/// Compute all subscores, ranks, and classifications for one horizon.
pub fn project_horizon(
    universe: &[EntityHistory],
    spec: &HorizonSpec,
    params: &ProjectionParams,
    stress: StressRegime,
) -> Vec<ProjectionEntity> {
    let n = universe.len();
    if n == 0 {
        return Vec::new();
    }

    let returns: Vec<f64> = universe
        .iter()
        .map(|e| subscores::period_return(&e.values, spec.period))
        .collect();

    // Trend: period return plus half the distance from the long MA.
    let trend_raw: Vec<f64> = universe
        .iter()
        .zip(&returns)
        .map(|(e, &r)| r + 0.5 * subscores::distance_from_ma(&e.values, spec.long_ma))
        .collect();
    let trend: Vec<f64> =
        subscores::percentile_ranks(&trend_raw).iter().map(|p| p * 100.0).collect();

    // Relative strength against the benchmark entity, or the universe
    // average return when no benchmark is configured.
    let benchmark_return = params
        .benchmark
        .as_ref()
        .and_then(|b| universe.iter().position(|e| &e.entity_id == b))
        .map(|idx| returns[idx])
        .unwrap_or_else(|| subscores::finite_mean(&returns));
    let rel_raw: Vec<f64> = returns.iter().map(|r| r - benchmark_return).collect();
    let rel: Vec<f64> = subscores::percentile_ranks(&rel_raw).iter().map(|p| p * 100.0).collect();

    // Risk: inverted rank of volatility plus half the absolute drawdown —
    // lower risk scores higher.
    let risk_raw: Vec<f64> = universe
        .iter()
        .map(|e| {
            subscores::annualized_volatility(&e.values, spec.period)
                + 0.5 * subscores::max_drawdown(&e.values, spec.period).abs()
        })
        .collect();
    let risk: Vec<f64> =
        subscores::percentile_ranks(&risk_raw).iter().map(|p| (1.0 - p) * 100.0).collect();

    let regime: Vec<f64> = regime_adjustments(universe, &risk, params, stress);

    let totals: Vec<f64> = (0..n)
        .map(|i| {
            let w = &spec.weights;
            w.trend * trend[i] + w.rel * rel[i] + w.risk * risk[i] + w.regime * regime[i]
        })
        .collect();

    let ranks = assign_ranks(&totals);
    let classes = classify_bands(&ranks, n, spec.winner_band, spec.loser_band);

    universe
        .iter()
        .enumerate()
        .map(|(i, e)| ProjectionEntity {
            entity_id: e.entity_id.clone(),
            horizon: spec.label.clone(),
            score_trend: trend[i],
            score_rel: rel[i],
            score_risk: risk[i],
            score_regime: regime[i],
            score_total: totals[i],
            rank: ranks[i],
            classification: classes[i],
        })
        .collect()
}

/// Regime adjustment: neutral 50 outside stress; under stress, defensive
/// categories take a +5 bonus and riskier-than-median entities take a -5
/// penalty.
fn regime_adjustments(
    universe: &[EntityHistory],
    risk_scores: &[f64],
    params: &ProjectionParams,
    stress: StressRegime,
) -> Vec<f64> {
    if !stress.is_stressed() {
        return vec![50.0; universe.len()];
    }
    let median_risk = subscores::finite_median(risk_scores);
    universe
        .iter()
        .zip(risk_scores)
        .map(|(e, &risk)| {
            if params.defensive_categories.iter().any(|c| c == &e.category) {
                55.0
            } else if risk < median_risk {
                45.0
            } else {
                50.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(entity_id: &str, category: &str, start: f64, drift: f64, wiggle: f64) -> EntityHistory {
        let values = (0..120)
            .map(|i| start + drift * i as f64 + wiggle * ((i as f64) * 0.9).sin())
            .collect();
        EntityHistory { entity_id: entity_id.into(), category: category.into(), values }
    }

    fn params(horizons: Vec<HorizonSpec>) -> ProjectionParams {
        ProjectionParams {
            horizons,
            benchmark: None,
            defensive_categories: vec!["defensive".into()],
            envelope: EnvelopeParams::default(),
        }
    }

    fn horizon(label: &str, period: usize) -> HorizonSpec {
        HorizonSpec {
            label: label.into(),
            period,
            long_ma: 60,
            weights: SubscoreWeights::default(),
            winner_band: 1,
            loser_band: 1,
        }
    }

    #[test]
    fn strong_uptrend_outranks_downtrend() {
        let universe = vec![
            trending("tech", "cyclical", 100.0, 0.8, 1.0),
            trending("utilities", "defensive", 100.0, 0.1, 1.0),
            trending("energy", "cyclical", 100.0, -0.5, 1.0),
        ];
        let p = params(vec![horizon("3m", 60)]);
        let result = project(&universe, &p, StressRegime::Normal);

        let by_id = |id: &str| result.entities.iter().find(|e| e.entity_id == id).unwrap();
        assert_eq!(by_id("tech").rank, 1);
        assert_eq!(by_id("tech").classification, Classification::Winner);
        assert_eq!(by_id("energy").rank, 3);
        assert_eq!(by_id("energy").classification, Classification::Loser);
        assert_eq!(by_id("utilities").classification, Classification::Neutral);
    }

    #[test]
    fn regime_adjustment_only_under_stress() {
        let universe = vec![
            trending("a", "defensive", 100.0, 0.2, 1.0),
            trending("b", "cyclical", 100.0, 0.2, 4.0),
        ];
        let p = params(vec![horizon("1m", 20)]);

        let calm = project(&universe, &p, StressRegime::Calm);
        assert!(calm.entities.iter().all(|e| e.score_regime == 50.0));

        let stressed = project(&universe, &p, StressRegime::Critical);
        let defensive = stressed.entities.iter().find(|e| e.entity_id == "a").unwrap();
        assert_eq!(defensive.score_regime, 55.0);
    }

    #[test]
    fn subscores_stay_in_range() {
        let universe: Vec<EntityHistory> = (0..8)
            .map(|i| trending(&format!("e{i}"), "cyclical", 50.0, (i as f64 - 4.0) * 0.3, 2.0))
            .collect();
        let p = params(vec![horizon("1m", 20), horizon("3m", 60)]);
        let result = project(&universe, &p, StressRegime::Elevated);
        for e in &result.entities {
            for s in [e.score_trend, e.score_rel, e.score_risk, e.score_regime, e.score_total] {
                assert!((0.0..=100.0).contains(&s), "{} out of range: {s}", e.entity_id);
            }
        }
    }

    #[test]
    fn one_cone_per_entity_per_horizon() {
        let universe = vec![
            trending("a", "cyclical", 100.0, 0.3, 1.0),
            trending("b", "cyclical", 100.0, -0.3, 1.0),
        ];
        let p = params(vec![horizon("1m", 20), horizon("3m", 60)]);
        let result = project(&universe, &p, StressRegime::Normal);
        assert_eq!(result.cones.len(), 4);
    }

    #[test]
    fn empty_universe_is_empty_projection() {
        let p = params(vec![horizon("1m", 20)]);
        let result = project(&[], &p, StressRegime::Normal);
        assert!(result.entities.is_empty());
        assert!(result.cones.is_empty());
    }

    #[test]
    fn projection_is_deterministic() {
        let universe: Vec<EntityHistory> = (0..6)
            .map(|i| trending(&format!("e{i}"), "cyclical", 80.0, (i as f64) * 0.1, 1.5))
            .collect();
        let p = params(vec![horizon("3m", 60)]);
        let a = project(&universe, &p, StressRegime::Normal);
        let b = project(&universe, &p, StressRegime::Normal);
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.cones, b.cones);
    }
}
