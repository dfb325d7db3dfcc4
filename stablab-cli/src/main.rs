//! StabLab CLI — evaluate, project, and smooth commands.
//!
//! Commands:
//! - `evaluate` — run the scoring pipeline over a JSON snapshot and a TOML
//!   config, printing a summary and optionally writing artifacts
//! - `project` — run the multi-horizon projection engine over a history
//!   snapshot, optionally taking the stress band from a prior evaluation
//! - `smooth` — apply the sparkline smoother to a JSON series (numeric or
//!   categorical states)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stablab_core::domain::StabilityValue;
use stablab_core::regime::{SignalLight, StressRegime};
use stablab_core::smoothing;
use stablab_runner::{
    evaluate, export_evaluation_json, export_leaderboard_csv, export_projection_json,
    export_scores_csv, import_evaluation_json, run_projection, EvaluationConfig, HistorySnapshot,
    Snapshot,
};

#[derive(Parser)]
#[command(name = "stablab", about = "StabLab CLI — stability scoring and projection engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scoring pipeline over a snapshot.
    Evaluate {
        /// Path to a JSON snapshot file.
        #[arg(long)]
        snapshot: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Prior evaluation report (JSON); its composite is held as stale
        /// when the completeness gate closes.
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Directory to write artifacts into.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the score table as CSV (requires --out).
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Run the multi-horizon projection engine over a history snapshot.
    Project {
        /// Path to a JSON history snapshot file.
        #[arg(long)]
        history: PathBuf,

        /// Path to a TOML config file with a [projection] section.
        #[arg(long)]
        config: PathBuf,

        /// Evaluation report (JSON) supplying the current stress band.
        /// Defaults to the Normal band when omitted.
        #[arg(long)]
        evaluation: Option<PathBuf>,

        /// Directory to write artifacts into.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the leaderboard as CSV (requires --out).
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Smooth a JSON series for display.
    Smooth {
        /// Path to a JSON array: numbers, or state strings with --states.
        #[arg(long)]
        input: PathBuf,

        /// Treat the input as categorical states (red/yellow/green).
        #[arg(long, default_value_t = false)]
        states: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate { snapshot, config, previous, out, csv } => {
            cmd_evaluate(&snapshot, &config, previous.as_deref(), out.as_deref(), csv)
        }
        Commands::Project { history, config, evaluation, out, csv } => {
            cmd_project(&history, &config, evaluation.as_deref(), out.as_deref(), csv)
        }
        Commands::Smooth { input, states } => cmd_smooth(&input, states),
    }
}

fn cmd_evaluate(
    snapshot_path: &Path,
    config_path: &Path,
    previous_path: Option<&Path>,
    out: Option<&Path>,
    csv: bool,
) -> Result<()> {
    if csv && out.is_none() {
        bail!("--csv requires --out");
    }

    let snapshot = Snapshot::load(snapshot_path)?;
    let config = EvaluationConfig::load_toml(config_path)?;
    let previous = previous_path
        .map(|p| -> Result<_> {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read previous report {}", p.display()))?;
            Ok(import_evaluation_json(&text)?.composite)
        })
        .transpose()?;

    let report = evaluate(&snapshot, &config, previous.as_ref())?;

    println!("run_id: {}", report.run_id);
    println!("as_of: {}", report.as_of);
    match &report.composite.stability {
        StabilityValue::Valid { score } => println!("stability: {score:.2}"),
        StabilityValue::Stale { score, as_of } => {
            println!("stability: {score:.2} (stale, as of {as_of})")
        }
        StabilityValue::Insufficient { reason } => println!("stability: insufficient ({reason:?})"),
    }
    println!(
        "completeness: {:.1}% ({}/{} active)",
        report.composite.completeness_pct * 100.0,
        report.composite.active_count,
        report.composite.total_count
    );
    if let Some(regime) = report.composite.regime {
        println!("signal: {regime:?}");
    }
    if let Some(stress) = report.stress {
        println!("stress: {stress:?}");
    }
    if let Some(metals) = report.metals {
        println!("metals: {metals:?}");
    }

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output dir {}", dir.display()))?;
        let json_path = dir.join("evaluation.json");
        std::fs::write(&json_path, export_evaluation_json(&report)?)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        println!("wrote {}", json_path.display());
        if csv {
            let csv_path = dir.join("scores.csv");
            std::fs::write(&csv_path, export_scores_csv(&report)?)
                .with_context(|| format!("failed to write {}", csv_path.display()))?;
            println!("wrote {}", csv_path.display());
        }
    }
    Ok(())
}

fn cmd_project(
    history_path: &Path,
    config_path: &Path,
    evaluation_path: Option<&Path>,
    out: Option<&Path>,
    csv: bool,
) -> Result<()> {
    if csv && out.is_none() {
        bail!("--csv requires --out");
    }

    let history = HistorySnapshot::load(history_path)?;
    let config = EvaluationConfig::load_toml(config_path)?;
    let stress = match evaluation_path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read evaluation report {}", p.display()))?;
            import_evaluation_json(&text)?.stress.unwrap_or(StressRegime::Normal)
        }
        None => StressRegime::Normal,
    };

    let report = run_projection(&history, &config, stress)?;

    println!("run_id: {}", report.run_id);
    println!("as_of: {} (stress: {stress:?})", report.as_of);
    for horizon in &report.horizons {
        println!("horizon {horizon}:");
        for e in report.leaderboard(horizon) {
            println!(
                "  #{:<2} {:<16} {:>6.2}  {:?}",
                e.rank, e.entity_id, e.score_total, e.classification
            );
        }
    }

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output dir {}", dir.display()))?;
        let json_path = dir.join("projection.json");
        std::fs::write(&json_path, export_projection_json(&report)?)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        println!("wrote {}", json_path.display());
        if csv {
            let csv_path = dir.join("leaderboard.csv");
            std::fs::write(&csv_path, export_leaderboard_csv(&report)?)
                .with_context(|| format!("failed to write {}", csv_path.display()))?;
            println!("wrote {}", csv_path.display());
        }
    }
    Ok(())
}

fn cmd_smooth(input: &Path, states: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input {}", input.display()))?;

    if states {
        let raw: Vec<String> =
            serde_json::from_str(&text).context("expected a JSON array of state strings")?;
        let parsed: Vec<SignalLight> = raw
            .iter()
            .map(|s| match s.to_ascii_lowercase().as_str() {
                "red" => Ok(SignalLight::Red),
                "yellow" => Ok(SignalLight::Yellow),
                "green" => Ok(SignalLight::Green),
                other => bail!("unknown state {other:?} (expected red/yellow/green)"),
            })
            .collect::<Result<_>>()?;
        let smoothed = smoothing::sparkline_states(&parsed);
        println!("{}", serde_json::to_string(&smoothed)?);
    } else {
        let values: Vec<f64> =
            serde_json::from_str(&text).context("expected a JSON array of numbers")?;
        let smoothed = smoothing::sparkline(&values);
        println!("{}", serde_json::to_string(&smoothed)?);
    }
    Ok(())
}
