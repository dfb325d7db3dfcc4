//! Indicator normalization — raw metric series in, 0–100 score series out.
//!
//! Normalizers are pure functions computed over the whole series at once.
//! The first `lookback()` values of the output are `f64::NAN` (warmup); a
//! metric whose series does not cover the lookback is marked missing, never
//! scored from partial data.

pub mod linear;
pub mod zscore;

pub use linear::LinearClamp;
pub use zscore::{MomentumBlend, ZScore};

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, MetricSeries, NormalizedScore};

/// Trait for normalization transforms.
///
/// A normalizer maps a raw value series to a score series of the same
/// length, each entry in [0, 100] or NaN during warmup. Direction correction
/// is applied by the caller, after the transform.
pub trait Normalizer: Send + Sync {
    /// Human-readable name (e.g., "linear_clamp", "zscore_520").
    fn name(&self) -> &str;

    /// Number of samples consumed before the first valid output.
    fn lookback(&self) -> usize;

    /// Compute the score series for the entire raw series.
    ///
    /// Returns a `Vec<f64>` of the same length as `raw`. The first
    /// `lookback()` values are `f64::NAN`.
    fn compute(&self, raw: &[f64]) -> Vec<f64>;
}

/// Clamp a transformed value into the score range.
///
/// Infinite inputs clamp to the nearest bound (0 or 100); NaN — which has no
/// nearest bound — substitutes the neutral midpoint rather than propagating.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        50.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Serializable normalizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizerConfig {
    /// Linear clamp: `clamp(0, 100, (raw - floor) * scale)`.
    LinearClamp { floor: f64, scale: f64 },

    /// Rolling z-score over `lookback` samples, optionally blended with a
    /// momentum z-score, mapped via `((z + 3) / 6) * 100`.
    ZScore {
        lookback: usize,
        #[serde(default)]
        momentum: Option<MomentumBlend>,
    },
}

impl NormalizerConfig {
    /// Build the concrete normalizer for this configuration.
    pub fn build(&self) -> Box<dyn Normalizer> {
        match self {
            NormalizerConfig::LinearClamp { floor, scale } => {
                Box::new(LinearClamp::new(*floor, *scale))
            }
            NormalizerConfig::ZScore { lookback, momentum } => {
                Box::new(ZScore::new(*lookback, *momentum))
            }
        }
    }
}

/// Normalize the latest sample of a series into a `NormalizedScore`.
///
/// Missing is emitted when the series is flagged unavailable, is empty, or
/// does not cover the normalizer's lookback. Otherwise the latest transformed
/// value is direction-corrected and clamped.
pub fn normalize_latest(
    normalizer: &dyn Normalizer,
    series: &MetricSeries,
    direction: Direction,
) -> NormalizedScore {
    let date = match series.latest() {
        Some(sample) => sample.date,
        None => {
            // No samples at all: date the record "today-less" is impossible,
            // so use the epoch-adjacent minimum; callers key off status.
            return NormalizedScore::missing(series.metric_id.clone(), chrono::NaiveDate::MIN, direction);
        }
    };

    if !series.available || series.samples.len() <= normalizer.lookback() {
        return NormalizedScore::missing(series.metric_id.clone(), date, direction);
    }

    let raw = series.raw_values();
    let scores = normalizer.compute(&raw);
    match scores.last() {
        Some(&s) if !s.is_nan() => {
            let corrected = clamp_score(direction.apply(s));
            NormalizedScore::active(series.metric_id.clone(), date, corrected, direction)
        }
        _ => NormalizedScore::missing(series.metric_id.clone(), date, direction),
    }
}

/// Normalize a whole series into a direction-corrected score series.
///
/// Warmup entries stay NaN; callers that feed the smoother should trim them.
pub fn score_series(
    normalizer: &dyn Normalizer,
    series: &MetricSeries,
    direction: Direction,
) -> Vec<f64> {
    if !series.available {
        return vec![f64::NAN; series.samples.len()];
    }
    let raw = series.raw_values();
    normalizer
        .compute(&raw)
        .into_iter()
        .map(|s| if s.is_nan() { f64::NAN } else { clamp_score(direction.apply(s)) })
        .collect()
}

#[cfg(test)]
pub(crate) fn make_series(metric_id: &str, values: &[f64]) -> MetricSeries {
    use crate::domain::MetricSample;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    MetricSeries {
        metric_id: metric_id.to_string(),
        samples: values
            .iter()
            .enumerate()
            .map(|(i, &v)| MetricSample {
                metric_id: metric_id.to_string(),
                date: base + chrono::Duration::days(i as i64),
                raw_value: v,
            })
            .collect(),
        available: true,
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;
