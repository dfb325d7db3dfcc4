//! Full evaluation pipeline: normalize → redistribute → aggregate → classify.
//!
//! Per-metric normalization is embarrassingly parallel and fans out over
//! rayon; everything downstream of it is a cheap fold over the results. The
//! previous composite (for staleness) is supplied by the caller — the
//! pipeline itself holds no state.

use anyhow::Result;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use stablab_core::composite::aggregate;
use stablab_core::domain::{CompositeResult, MetricSeries, NormalizedScore};
use stablab_core::normalize::{normalize_latest, score_series};
use stablab_core::regime::{metals, stress, MetalsInputs, MetalsRegime, StressRegime};
use stablab_core::smoothing;

use crate::config::{EvaluationConfig, MetalsConfig, MetricConfig};
use crate::snapshot::Snapshot;
use crate::SCHEMA_VERSION;

/// Smoothed, down-sampled score series for one metric, display-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSparkline {
    pub metric_id: String,
    pub points: Vec<f64>,
}

/// Output of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub schema_version: u32,
    pub run_id: String,
    pub as_of: NaiveDate,
    pub composite: CompositeResult,
    pub scores: Vec<NormalizedScore>,
    /// Stress band of the composite stability score, when one exists.
    pub stress: Option<StressRegime>,
    /// Precious-metals regime, when the config wires one up.
    pub metals: Option<MetalsRegime>,
    pub sparklines: Vec<MetricSparkline>,
}

/// Run the full pipeline over one snapshot.
pub fn evaluate(
    snapshot: &Snapshot,
    config: &EvaluationConfig,
    previous: Option<&CompositeResult>,
) -> Result<EvaluationReport> {
    config.validate()?;
    snapshot.validate()?;

    // Per-metric normalization, parallel across metrics. Metrics without a
    // series in the snapshot come back missing.
    let per_metric: Vec<(NormalizedScore, MetricSparkline)> = config
        .metrics
        .par_iter()
        .map(|m| normalize_one(m, snapshot))
        .collect();

    let (scores, sparklines): (Vec<_>, Vec<_>) = per_metric.into_iter().unzip();

    let components = config.component_weights();
    let composite = aggregate(snapshot.as_of, &scores, &components, &config.composite, previous);

    let stress_band = composite
        .stability_score()
        .map(|s| stress::classify(s, &config.stress));

    let metals_regime = config
        .metals
        .as_ref()
        .map(|wiring| classify_metals(wiring, &scores, snapshot));

    Ok(EvaluationReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        as_of: snapshot.as_of,
        composite,
        scores,
        stress: stress_band,
        metals: metals_regime,
        sparklines,
    })
}

fn normalize_one(metric: &MetricConfig, snapshot: &Snapshot) -> (NormalizedScore, MetricSparkline) {
    let normalizer = metric.normalizer.build();
    match snapshot.series_for(&metric.metric_id) {
        Some(series) => {
            let score = normalize_latest(normalizer.as_ref(), series, metric.direction);
            let history = score_series(normalizer.as_ref(), series, metric.direction);
            let warm: Vec<f64> = history.into_iter().filter(|v| !v.is_nan()).collect();
            let sparkline = MetricSparkline {
                metric_id: metric.metric_id.clone(),
                points: smoothing::sparkline(&warm),
            };
            (score, sparkline)
        }
        None => {
            let empty = MetricSeries {
                metric_id: metric.metric_id.clone(),
                samples: Vec::new(),
                available: false,
            };
            let score = normalize_latest(normalizer.as_ref(), &empty, metric.direction);
            (score, MetricSparkline { metric_id: metric.metric_id.clone(), points: Vec::new() })
        }
    }
}

/// Gather the metals rule-chain inputs from normalized scores and the raw
/// ratio series. Missing pieces read as NaN and fall through the chain to
/// its default branch.
fn classify_metals(
    wiring: &MetalsConfig,
    scores: &[NormalizedScore],
    snapshot: &Snapshot,
) -> MetalsRegime {
    let score_of = |id: &str| {
        scores
            .iter()
            .find(|s| s.metric_id == id)
            .and_then(|s| s.score)
            .unwrap_or(f64::NAN)
    };
    let ratio = snapshot
        .series_for(&wiring.paper_physical)
        .and_then(|s| s.latest())
        .map(|sample| sample.raw_value)
        .unwrap_or(f64::NAN);

    let inputs = MetalsInputs {
        gold_score: score_of(&wiring.gold),
        silver_score: score_of(&wiring.silver),
        gold_momentum: score_of(&wiring.gold_momentum),
        silver_momentum: score_of(&wiring.silver_momentum),
        paper_physical_ratio: ratio,
    };
    metals::classify(&inputs, &wiring.thresholds)
}
