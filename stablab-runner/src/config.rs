//! Serializable evaluation configuration.
//!
//! Captures everything needed to reproduce an evaluation: per-metric
//! normalization families and weights, the completeness floor, regime
//! thresholds, and the projection horizon set. Two identical configs hash to
//! the same `RunId`, which is what makes result caching by the surrounding
//! system safe.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stablab_core::composite::CompositeParams;
use stablab_core::domain::{ComponentWeight, Direction};
use stablab_core::normalize::NormalizerConfig;
use stablab_core::projection::ProjectionParams;
use stablab_core::regime::{MetalsThresholds, StressThresholds};

/// Unique identifier for an evaluation run (content-addressable hash).
pub type RunId = String;

/// Static configuration for one metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricConfig {
    pub metric_id: String,
    pub category: String,
    pub base_weight: f64,
    #[serde(default)]
    pub required: bool,
    pub direction: Direction,
    pub normalizer: NormalizerConfig,
}

impl MetricConfig {
    pub fn component_weight(&self) -> ComponentWeight {
        ComponentWeight {
            metric_id: self.metric_id.clone(),
            base_weight: self.base_weight,
            category: self.category.clone(),
            required: self.required,
        }
    }
}

/// Metric wiring for the precious-metals regime classifier.
///
/// The four score inputs name metrics whose normalized scores feed the rule
/// chain; the ratio input names a metric whose latest raw value is read
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetalsConfig {
    pub gold: String,
    pub silver: String,
    pub gold_momentum: String,
    pub silver_momentum: String,
    pub paper_physical: String,
    #[serde(default)]
    pub thresholds: MetalsThresholds,
}

/// Full evaluation configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub metrics: Vec<MetricConfig>,

    #[serde(default)]
    pub composite: CompositeParams,

    #[serde(default)]
    pub stress: StressThresholds,

    /// Optional precious-metals regime wiring.
    #[serde(default)]
    pub metals: Option<MetalsConfig>,

    /// Optional projection configuration; `project` runs require it.
    #[serde(default)]
    pub projection: Option<ProjectionParams>,
}

impl EvaluationConfig {
    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId and can share cached
    /// artifacts downstream.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("EvaluationConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }

    /// Load from a TOML file.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation: non-empty metrics, unique ids, positive
    /// weights, metals wiring pointing at configured metrics.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.metrics.is_empty(), "config has no metrics");
        for (i, m) in self.metrics.iter().enumerate() {
            anyhow::ensure!(
                m.base_weight > 0.0,
                "metric {} has non-positive base_weight {}",
                m.metric_id,
                m.base_weight
            );
            for other in &self.metrics[i + 1..] {
                anyhow::ensure!(
                    m.metric_id != other.metric_id,
                    "duplicate metric_id {}",
                    m.metric_id
                );
            }
            if let NormalizerConfig::ZScore { lookback, momentum } = &m.normalizer {
                anyhow::ensure!(
                    *lookback >= 2,
                    "metric {} has z-score lookback {}, need at least 2",
                    m.metric_id,
                    lookback
                );
                if let Some(blend) = momentum {
                    anyhow::ensure!(
                        blend.window >= 1,
                        "metric {} has zero momentum window",
                        m.metric_id
                    );
                    anyhow::ensure!(
                        (0.0..=1.0).contains(&blend.weight),
                        "metric {} has momentum weight {} outside [0, 1]",
                        m.metric_id,
                        blend.weight
                    );
                }
            }
        }
        if let Some(metals) = &self.metals {
            for id in [&metals.gold, &metals.silver, &metals.gold_momentum, &metals.silver_momentum]
            {
                anyhow::ensure!(
                    self.metrics.iter().any(|m| &m.metric_id == id),
                    "metals config references unknown metric {id}"
                );
            }
        }
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.composite.completeness_floor),
            "completeness_floor must be in [0, 1]"
        );
        Ok(())
    }

    pub fn component_weights(&self) -> Vec<ComponentWeight> {
        self.metrics.iter().map(|m| m.component_weight()).collect()
    }
}
