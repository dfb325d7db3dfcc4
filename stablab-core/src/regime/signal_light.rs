//! 3-state traffic-light classifier for direction-normalized scores.

use serde::{Deserialize, Serialize};

/// Green/Yellow/Red banding of a 0–100 stability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLight {
    Green,
    Yellow,
    Red,
}

impl SignalLight {
    /// Ordinal used by the categorical smoother: Red=0, Yellow=1, Green=2.
    pub fn ordinal(self) -> f64 {
        match self {
            SignalLight::Red => 0.0,
            SignalLight::Yellow => 1.0,
            SignalLight::Green => 2.0,
        }
    }

    /// Re-quantize a smoothed ordinal at the fixed midpoints 0.67 / 1.67.
    ///
    /// Non-finite ordinals map to Yellow (neutral) rather than faulting.
    pub fn from_ordinal(value: f64) -> Self {
        if !value.is_finite() {
            return SignalLight::Yellow;
        }
        if value < 0.67 {
            SignalLight::Red
        } else if value < 1.67 {
            SignalLight::Yellow
        } else {
            SignalLight::Green
        }
    }
}

/// Band cut points. Green at or above `green`, Yellow at or above `yellow`,
/// Red below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalLightThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl Default for SignalLightThresholds {
    fn default() -> Self {
        Self { green: 70.0, yellow: 40.0 }
    }
}

/// Classify a stability score into a traffic light.
///
/// Total over all inputs: a non-finite score falls through the bands to Red,
/// the mandatory default branch.
pub fn classify(score: f64, thresholds: &SignalLightThresholds) -> SignalLight {
    if score >= thresholds.green {
        SignalLight::Green
    } else if score >= thresholds.yellow {
        SignalLight::Yellow
    } else {
        SignalLight::Red
    }
}
