//! 5-state precious-metals regime — a fixed-priority rule chain over
//! derived ratios.
//!
//! Rule order is the contract: risk-ratio breach wins over everything, then
//! gold bias high, then momentum, then gold bias low, then the mandatory
//! default. The numeric thresholds are tunable configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetalsRegime {
    /// Paper/physical risk ratio breached: delivery stress.
    Crisis,
    /// Gold strongly outperforming silver: flight to safety.
    Stress,
    /// Broad metals momentum strongly positive.
    CommodityBull,
    /// Silver strongly outperforming gold: reflation trade.
    Reflation,
    /// Default branch.
    Neutral,
}

/// Inputs to the metals rule chain, all derived upstream from normalized
/// scores and one raw ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetalsInputs {
    /// Normalized gold stability score, 0–100.
    pub gold_score: f64,
    /// Normalized silver stability score, 0–100.
    pub silver_score: f64,
    /// 30-period gold momentum score, 0–100.
    pub gold_momentum: f64,
    /// 30-period silver momentum score, 0–100.
    pub silver_momentum: f64,
    /// Paper-to-physical open-interest ratio, raw.
    pub paper_physical_ratio: f64,
}

impl MetalsInputs {
    /// `(gold_score - silver_score) / 100`, in [-1, 1].
    pub fn gold_bias(&self) -> f64 {
        (self.gold_score - self.silver_score) / 100.0
    }

    /// Average of the two 30-period momentum scores.
    pub fn momentum(&self) -> f64 {
        (self.gold_momentum + self.silver_momentum) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalsThresholds {
    /// Paper/physical ratio at or above this is a Crisis.
    pub ratio_crisis: f64,
    /// Gold bias above this is Stress.
    pub bias_stress: f64,
    /// Average momentum above this is CommodityBull.
    pub momentum_bull: f64,
    /// Gold bias below this is Reflation.
    pub bias_reflation: f64,
}

impl Default for MetalsThresholds {
    fn default() -> Self {
        Self {
            ratio_crisis: 100.0,
            bias_stress: 0.25,
            momentum_bull: 65.0,
            bias_reflation: -0.25,
        }
    }
}

/// Evaluate the rule chain in fixed priority order.
///
/// Total: rules with non-finite operands simply fail their comparison and
/// fall through, so every input lands on exactly one label.
pub fn classify(inputs: &MetalsInputs, thresholds: &MetalsThresholds) -> MetalsRegime {
    let bias = inputs.gold_bias();
    let momentum = inputs.momentum();

    if inputs.paper_physical_ratio >= thresholds.ratio_crisis {
        MetalsRegime::Crisis
    } else if bias > thresholds.bias_stress {
        MetalsRegime::Stress
    } else if momentum > thresholds.momentum_bull {
        MetalsRegime::CommodityBull
    } else if bias < thresholds.bias_reflation {
        MetalsRegime::Reflation
    } else {
        MetalsRegime::Neutral
    }
}
