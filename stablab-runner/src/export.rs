//! Artifact export — JSON and CSV generation.
//!
//! Two export formats per report:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: per-metric score table and per-horizon leaderboard for
//!   external analysis tools
//!
//! All persisted artifacts include a `schema_version` field. Unknown newer
//! versions are rejected on load.

use anyhow::{bail, Context, Result};

use crate::evaluate::EvaluationReport;
use crate::project::ProjectionReport;
use crate::SCHEMA_VERSION;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `EvaluationReport` to pretty JSON.
pub fn export_evaluation_json(report: &EvaluationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize EvaluationReport to JSON")
}

/// Deserialize an `EvaluationReport`, rejecting unknown schema versions.
pub fn import_evaluation_json(json: &str) -> Result<EvaluationReport> {
    let report: EvaluationReport =
        serde_json::from_str(json).context("failed to deserialize EvaluationReport from JSON")?;
    check_schema(report.schema_version)?;
    Ok(report)
}

/// Serialize a `ProjectionReport` to pretty JSON.
pub fn export_projection_json(report: &ProjectionReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ProjectionReport to JSON")
}

/// Deserialize a `ProjectionReport`, rejecting unknown schema versions.
pub fn import_projection_json(json: &str) -> Result<ProjectionReport> {
    let report: ProjectionReport =
        serde_json::from_str(json).context("failed to deserialize ProjectionReport from JSON")?;
    check_schema(report.schema_version)?;
    Ok(report)
}

fn check_schema(version: u32) -> Result<()> {
    if version > SCHEMA_VERSION {
        bail!("unsupported schema version {version} (max supported: {SCHEMA_VERSION})");
    }
    Ok(())
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the per-metric score table as CSV.
///
/// Columns: metric_id, date, score, direction, status
pub fn export_scores_csv(report: &EvaluationReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["metric_id", "date", "score", "direction", "status"])?;
    for s in &report.scores {
        wtr.write_record([
            &s.metric_id,
            &s.date.to_string(),
            &s.score.map(|v| format!("{v:.4}")).unwrap_or_default(),
            &format!("{:?}", s.direction),
            &format!("{:?}", s.status),
        ])?;
    }

    let bytes = wtr.into_inner().context("CSV writer flush failed")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Export the projection leaderboard as CSV, all horizons, sorted by
/// (horizon, rank).
///
/// Columns: horizon, rank, entity_id, classification, score_total,
/// score_trend, score_rel, score_risk, score_regime, sigma
pub fn export_leaderboard_csv(report: &ProjectionReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "horizon",
        "rank",
        "entity_id",
        "classification",
        "score_total",
        "score_trend",
        "score_rel",
        "score_risk",
        "score_regime",
        "sigma",
    ])?;

    for horizon in &report.horizons {
        for e in report.leaderboard(horizon) {
            let sigma = report
                .cones
                .iter()
                .find(|c| c.entity_id == e.entity_id && &c.horizon == horizon)
                .map(|c| format!("{:.4}", c.sigma))
                .unwrap_or_default();
            wtr.write_record([
                horizon,
                &e.rank.to_string(),
                &e.entity_id,
                &format!("{:?}", e.classification),
                &format!("{:.4}", e.score_total),
                &format!("{:.4}", e.score_trend),
                &format!("{:.4}", e.score_rel),
                &format!("{:.4}", e.score_risk),
                &format!("{:.4}", e.score_regime),
                &sigma,
            ])?;
        }
    }

    let bytes = wtr.into_inner().context("CSV writer flush failed")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
