//! Snapshot loading and validation.
//!
//! A snapshot is the complete input to one evaluation: the as-of date plus
//! one series per metric, as delivered by the acquisition collaborators.
//! Loading validates structure (time order, unique ids) so the pure core can
//! assume well-formed input.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stablab_core::domain::MetricSeries;
use stablab_core::projection::EntityHistory;

/// Input snapshot for an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub as_of: NaiveDate,
    pub series: Vec<MetricSeries>,
}

impl Snapshot {
    /// Load and validate a JSON snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Structural validation: unique metric ids, time-ordered samples,
    /// sample ids matching their series.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for s in &self.series {
            anyhow::ensure!(
                seen.insert(s.metric_id.as_str()),
                "duplicate series for metric {}",
                s.metric_id
            );
            anyhow::ensure!(
                s.is_time_ordered(),
                "series {} is not strictly time-ordered",
                s.metric_id
            );
            for sample in &s.samples {
                anyhow::ensure!(
                    sample.metric_id == s.metric_id,
                    "sample id {} inside series {}",
                    sample.metric_id,
                    s.metric_id
                );
            }
        }
        Ok(())
    }

    /// The series for one metric, if present.
    pub fn series_for(&self, metric_id: &str) -> Option<&MetricSeries> {
        self.series.iter().find(|s| s.metric_id == metric_id)
    }
}

/// Input snapshot for a projection run: per-entity value histories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub as_of: NaiveDate,
    pub entities: Vec<EntityHistory>,
}

impl HistorySnapshot {
    /// Load and validate a JSON history snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse history {}", path.display()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.entities.is_empty(), "history has no entities");
        let mut seen = HashSet::new();
        for e in &self.entities {
            anyhow::ensure!(
                seen.insert(e.entity_id.as_str()),
                "duplicate entity {}",
                e.entity_id
            );
            anyhow::ensure!(
                !e.values.is_empty(),
                "entity {} has an empty value series",
                e.entity_id
            );
        }
        Ok(())
    }
}
