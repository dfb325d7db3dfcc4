//! Uncertainty cone construction.
//!
//! A display heuristic, not a statistical interval: sigma starts at a small
//! constant at the first horizon and widens with the observed inter-horizon
//! score delta plus an additive floor. Monotonicity is enforced in code, so
//! the envelope never narrows whatever the parameters. Nothing here feeds
//! back into ranking or classification.

use serde::{Deserialize, Serialize};

use super::{ProjectionEntity, UncertaintyCone};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    /// Sigma at the first horizon.
    pub initial_sigma: f64,
    /// Multiplier on the inter-horizon score delta.
    pub delta_coef: f64,
    /// Additive floor per horizon step.
    pub floor: f64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self { initial_sigma: 2.0, delta_coef: 0.6, floor: 1.5 }
    }
}

/// Build one cone per `(entity, horizon)` from the projection records.
///
/// `horizon_order` fixes the forward sequence; entities missing a horizon
/// simply have no cone for it.
pub fn build_cones(
    entities: &[ProjectionEntity],
    horizon_order: &[String],
    params: &EnvelopeParams,
) -> Vec<UncertaintyCone> {
    let mut entity_ids: Vec<&str> = entities.iter().map(|e| e.entity_id.as_str()).collect();
    entity_ids.sort_unstable();
    entity_ids.dedup();

    let mut cones = Vec::new();
    for id in entity_ids {
        let mut sigma = params.initial_sigma;
        let mut prev_score: Option<f64> = None;
        for horizon in horizon_order {
            let Some(record) = entities
                .iter()
                .find(|e| e.entity_id == id && &e.horizon == horizon)
            else {
                continue;
            };
            if let Some(prev) = prev_score {
                let delta = (record.score_total - prev).abs();
                sigma = sigma.max(delta * params.delta_coef + params.floor);
            }
            cones.push(UncertaintyCone {
                entity_id: record.entity_id.clone(),
                horizon: horizon.clone(),
                center_score: record.score_total,
                sigma,
            });
            prev_score = Some(record.score_total);
        }
    }
    cones
}
