//! Linear clamp transform.
//!
//! `score = clamp(0, 100, (raw - floor) * scale)`. No lookback: every sample
//! scores immediately.

use super::{clamp_score, Normalizer};

#[derive(Debug, Clone)]
pub struct LinearClamp {
    floor: f64,
    scale: f64,
    name: String,
}

impl LinearClamp {
    pub fn new(floor: f64, scale: f64) -> Self {
        Self {
            floor,
            scale,
            name: "linear_clamp".to_string(),
        }
    }
}

impl Normalizer for LinearClamp {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter()
            .map(|&v| clamp_score((v - self.floor) * self.scale))
            .collect()
    }
}
