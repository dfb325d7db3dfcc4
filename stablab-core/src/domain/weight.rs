//! ComponentWeight — static per-metric weighting configuration.

use serde::{Deserialize, Serialize};

/// Static configuration for one composite component.
///
/// `base_weight` is the configured weight before redistribution. `required`
/// components suppress the composite outright when missing, regardless of
/// overall completeness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentWeight {
    pub metric_id: String,
    pub base_weight: f64,
    pub category: String,
    #[serde(default)]
    pub required: bool,
}

impl ComponentWeight {
    pub fn new(metric_id: impl Into<String>, base_weight: f64, category: impl Into<String>) -> Self {
        Self {
            metric_id: metric_id.into(),
            base_weight,
            category: category.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
