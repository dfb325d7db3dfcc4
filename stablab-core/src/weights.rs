//! Weight redistribution — rescale configured weights onto the currently
//! active components.
//!
//! The active set is an explicit value computed fresh per evaluation; weights
//! are never toggled in place, so a component flipping between evaluations
//! cannot leave stale weights behind.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{ComponentWeight, MetricId, NormalizedScore};

/// Errors from active-set resolution. Both suppress the composite.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error("required component {0} is missing")]
    RequiredComponentMissing(MetricId),

    #[error("no active components (active base weight sum is zero)")]
    NoActiveComponents,
}

/// One component's redistributed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWeight {
    pub metric_id: MetricId,
    pub base_weight: f64,
    /// `base_weight * total_base / active_base_sum`.
    pub weight: f64,
}

/// The freshly computed active component set for one evaluation.
#[derive(Debug, Clone)]
pub struct ActiveSet {
    weights: Vec<ResolvedWeight>,
    total_base: f64,
    active_count: usize,
    total_count: usize,
}

impl ActiveSet {
    /// Resolve the active set from the full weight configuration and the
    /// current per-metric statuses.
    ///
    /// A metric absent from `scores` counts as missing. A missing `required`
    /// component, or an empty active set, is an error — never a division
    /// fault.
    pub fn resolve(
        components: &[ComponentWeight],
        scores: &[NormalizedScore],
    ) -> Result<Self, WeightError> {
        let active_ids: HashMap<&str, ()> = scores
            .iter()
            .filter(|s| s.is_active())
            .map(|s| (s.metric_id.as_str(), ()))
            .collect();

        let mut total_base = 0.0;
        let mut active_base = 0.0;
        let mut active_count = 0;
        for c in components {
            total_base += c.base_weight;
            if active_ids.contains_key(c.metric_id.as_str()) {
                active_base += c.base_weight;
                active_count += 1;
            } else if c.required {
                return Err(WeightError::RequiredComponentMissing(c.metric_id.clone()));
            }
        }

        if active_base <= 0.0 {
            return Err(WeightError::NoActiveComponents);
        }

        let weights = components
            .iter()
            .filter(|c| active_ids.contains_key(c.metric_id.as_str()))
            .map(|c| ResolvedWeight {
                metric_id: c.metric_id.clone(),
                base_weight: c.base_weight,
                weight: c.base_weight * total_base / active_base,
            })
            .collect();

        Ok(Self {
            weights,
            total_base,
            active_count,
            total_count: components.len(),
        })
    }

    pub fn weights(&self) -> &[ResolvedWeight] {
        &self.weights
    }

    /// The redistributed weight for a metric, if it is active.
    pub fn weight(&self, metric_id: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.metric_id == metric_id)
            .map(|w| w.weight)
    }

    /// Sum of configured base weights over all components.
    pub fn total_base(&self) -> f64 {
        self.total_base
    }

    /// Sum of redistributed weights. Equals `total_base()` within tolerance
    /// (mass preservation).
    pub fn redistributed_total(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// `active_count / total_count`, in [0, 1].
    pub fn completeness_pct(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.active_count as f64 / self.total_count as f64
        }
    }
}
