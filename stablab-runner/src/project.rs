//! Projection orchestration: subscores, ranks, bands, and cones per horizon.
//!
//! Horizons are independent of each other, so they fan out over rayon; the
//! cones are assembled afterwards from the full horizon sequence.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use stablab_core::projection::{
    build_cones, project_horizon, ProjectionEntity, ProjectionParams, UncertaintyCone,
};
use stablab_core::regime::StressRegime;

use crate::config::EvaluationConfig;
use crate::snapshot::HistorySnapshot;
use crate::SCHEMA_VERSION;

/// Output of one projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub schema_version: u32,
    pub run_id: String,
    pub as_of: NaiveDate,
    pub horizons: Vec<String>,
    pub entities: Vec<ProjectionEntity>,
    pub cones: Vec<UncertaintyCone>,
}

impl ProjectionReport {
    /// Records for one horizon, sorted by rank.
    pub fn leaderboard(&self, horizon: &str) -> Vec<&ProjectionEntity> {
        let mut rows: Vec<&ProjectionEntity> =
            self.entities.iter().filter(|e| e.horizon == horizon).collect();
        rows.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.entity_id.cmp(&b.entity_id)));
        rows
    }
}

/// Run the projection engine over a history snapshot.
///
/// `stress` is the current stress band from the evaluation side; it only
/// drives the small regime adjustment subscore.
pub fn run_projection(
    history: &HistorySnapshot,
    config: &EvaluationConfig,
    stress: StressRegime,
) -> Result<ProjectionReport> {
    history.validate()?;
    let params: &ProjectionParams = config
        .projection
        .as_ref()
        .context("config has no [projection] section")?;
    anyhow::ensure!(!params.horizons.is_empty(), "projection config has no horizons");

    let entities: Vec<ProjectionEntity> = params
        .horizons
        .par_iter()
        .map(|spec| project_horizon(&history.entities, spec, params, stress))
        .reduce(Vec::new, |mut acc, mut chunk| {
            acc.append(&mut chunk);
            acc
        });

    // Parallel reduce does not guarantee horizon order; restore it so the
    // report and the cone construction see the configured sequence.
    let horizon_order: Vec<String> = params.horizons.iter().map(|h| h.label.clone()).collect();
    let mut entities = entities;
    entities.sort_by_key(|e| {
        horizon_order.iter().position(|h| h == &e.horizon).unwrap_or(usize::MAX)
    });

    let cones = build_cones(&entities, &horizon_order, &params.envelope);

    Ok(ProjectionReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        as_of: history.as_of,
        horizons: horizon_order,
        entities,
        cones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stablab_core::projection::{Classification, EntityHistory, SubscoreWeights};

    fn entity(id: &str, drift: f64) -> EntityHistory {
        EntityHistory {
            entity_id: id.into(),
            category: "cyclical".into(),
            values: (0..150)
                .map(|i| 100.0 + drift * i as f64 + ((i as f64) * 0.7).sin() * 2.0)
                .collect(),
        }
    }

    fn history() -> HistorySnapshot {
        HistorySnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            entities: vec![
                entity("strong", 0.8),
                entity("steady", 0.2),
                entity("flat", 0.0),
                entity("weak", -0.5),
            ],
        }
    }

    fn config() -> EvaluationConfig {
        let toml_text = r#"
            [[metrics]]
            metric_id = "placeholder"
            category = "macro"
            base_weight = 1.0
            direction = "higher_is_stable"
            normalizer = { type = "LINEAR_CLAMP", floor = 0.0, scale = 1.0 }

            [projection]
            defensive_categories = ["defensive"]

            [[projection.horizons]]
            label = "1m"
            period = 21
            long_ma = 100
            winner_band = 1
            loser_band = 1

            [[projection.horizons]]
            label = "3m"
            period = 63
            long_ma = 100
            winner_band = 1
            loser_band = 1
        "#;
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn report_covers_all_pairs() {
        let report = run_projection(&history(), &config(), StressRegime::Normal).unwrap();
        assert_eq!(report.entities.len(), 8);
        assert_eq!(report.cones.len(), 8);
        assert_eq!(report.horizons, vec!["1m".to_string(), "3m".to_string()]);
    }

    #[test]
    fn leaderboard_sorted_by_rank() {
        let report = run_projection(&history(), &config(), StressRegime::Normal).unwrap();
        let board = report.leaderboard("3m");
        assert_eq!(board.len(), 4);
        assert!(board.windows(2).all(|w| w[0].rank <= w[1].rank));
        assert_eq!(board[0].entity_id, "strong");
        assert_eq!(board[0].classification, Classification::Winner);
        assert_eq!(board[3].entity_id, "weak");
        assert_eq!(board[3].classification, Classification::Loser);
    }

    #[test]
    fn missing_projection_section_is_an_error() {
        let mut cfg = config();
        cfg.projection = None;
        assert!(run_projection(&history(), &cfg, StressRegime::Normal).is_err());
    }

    #[test]
    fn horizon_weights_default_when_omitted() {
        let cfg = config();
        let horizons = &cfg.projection.as_ref().unwrap().horizons;
        assert_eq!(horizons[0].weights, SubscoreWeights::default());
    }

    #[test]
    fn projection_is_repeatable() {
        let a = run_projection(&history(), &config(), StressRegime::Critical).unwrap();
        let b = run_projection(&history(), &config(), StressRegime::Critical).unwrap();
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.cones, b.cones);
    }
}
