//! StabLab Runner — orchestration around the pure scoring core.
//!
//! Loads snapshots and configuration, fans the normalization and projection
//! work out across threads, and exports schema-versioned artifacts. All
//! statefulness (previous results for staleness, file I/O) lives here; the
//! core stays pure.

pub mod config;
pub mod evaluate;
pub mod export;
pub mod project;
pub mod snapshot;

pub use config::{EvaluationConfig, MetalsConfig, MetricConfig, RunId};
pub use evaluate::{evaluate, EvaluationReport, MetricSparkline};
pub use export::{
    export_evaluation_json, export_projection_json, export_scores_csv, import_evaluation_json,
    import_projection_json, export_leaderboard_csv,
};
pub use project::{run_projection, ProjectionReport};
pub use snapshot::{HistorySnapshot, Snapshot};

/// Version stamped on every exported artifact. Imports reject anything newer.
pub const SCHEMA_VERSION: u32 = 1;
