//! Rolling z-score transform with optional momentum blend.
//!
//! `z = (raw - rolling_mean) / rolling_stdev` over a lookback window
//! (commonly 520 weekly samples), optionally blended with a z-score of a
//! short-window rate of change:
//! `z_blended = (1 - w) * z_base + w * z_momentum` (w commonly 0.25).
//! The score mapping is `clamp(0, 100, ((z + 3) / 6) * 100)`.
//!
//! Zero-variance windows yield z = 0 — the neutral midpoint 50 — rather
//! than a division fault.

use serde::{Deserialize, Serialize};

use super::{clamp_score, Normalizer};

/// Momentum blend parameters. Both the window and the blend weight are
/// tunable configuration, not invariants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MomentumBlend {
    /// Rate-of-change window in samples.
    pub window: usize,
    /// Weight given to the momentum z-score, in [0, 1].
    pub weight: f64,
}

impl Default for MomentumBlend {
    fn default() -> Self {
        Self { window: 30, weight: 0.25 }
    }
}

#[derive(Debug, Clone)]
pub struct ZScore {
    lookback_samples: usize,
    momentum: Option<MomentumBlend>,
    name: String,
}

impl ZScore {
    pub fn new(lookback_samples: usize, momentum: Option<MomentumBlend>) -> Self {
        assert!(lookback_samples >= 2, "z-score lookback must be >= 2");
        Self {
            lookback_samples,
            momentum,
            name: format!("zscore_{lookback_samples}"),
        }
    }
}

/// Z-score of `value` against the finite entries of `window`.
///
/// Infinite values keep their sign (they clamp to a boundary score later);
/// NaN propagates to the neutral-midpoint substitution in `clamp_score`.
fn z_of(window: &[f64], value: f64) -> f64 {
    if value.is_nan() {
        return f64::NAN;
    }
    if value.is_infinite() {
        return value;
    }
    let finite: Vec<f64> = window.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return 0.0;
    }
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let var = finite.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / finite.len() as f64;
    let stdev = var.sqrt();
    if stdev < 1e-12 {
        return 0.0;
    }
    (value - mean) / stdev
}

fn z_to_score(z: f64) -> f64 {
    clamp_score(((z + 3.0) / 6.0) * 100.0)
}

impl Normalizer for ZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let momentum_warmup = self.momentum.map(|m| m.window).unwrap_or(0);
        self.lookback_samples - 1 + momentum_warmup
    }

    fn compute(&self, raw: &[f64]) -> Vec<f64> {
        let n = raw.len();
        let mut result = vec![f64::NAN; n];
        if n <= self.lookback() {
            return result;
        }

        // Short-window rate of change, when a momentum blend is configured.
        let roc: Option<Vec<f64>> = self.momentum.map(|m| {
            (0..n)
                .map(|i| {
                    if i < m.window {
                        return f64::NAN;
                    }
                    let base = raw[i - m.window];
                    if !base.is_finite() || base.abs() < 1e-12 {
                        f64::NAN
                    } else {
                        (raw[i] - base) / base.abs()
                    }
                })
                .collect()
        });

        let lb = self.lookback_samples;
        for i in self.lookback()..n {
            let window = &raw[i + 1 - lb..=i];
            let z_base = z_of(window, raw[i]);

            let z = match (self.momentum, &roc) {
                (Some(m), Some(roc)) => {
                    let roc_window = &roc[i + 1 - lb..=i];
                    let z_mom = z_of(roc_window, roc[i]);
                    if z_mom.is_finite() && z_base.is_finite() {
                        (1.0 - m.weight) * z_base + m.weight * z_mom
                    } else {
                        z_base
                    }
                }
                _ => z_base,
            };

            result[i] = z_to_score(z);
        }

        result
    }
}
