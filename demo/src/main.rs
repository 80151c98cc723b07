//! IHD Risk Reference Runtime: Demo CLI
//!
//! Classifies risk percentages, walks through the intake pipeline, and
//! prints cohort analytics for a snapshot file or the built-in seed cohort.
//!
//! Usage:
//!   cargo run -p demo -- classify 23.5
//!   cargo run -p demo -- intake [--policy ranges.toml]
//!   cargo run -p demo -- analyze [--snapshot cohort.json] [--x BMI] [--y Age] [--timeframe week]
//!   cargo run -p demo -- export-sample cohort.json
//!   cargo run -p demo -- run-all

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ihd_analytics::{ScatterAxes, ScatterFeature, Timeframe};
use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::UserId,
};
use ihd_core::classify;
use ihd_ref_clinic::{
    mock_data::{seed_cohort, CLINIC_USER},
    scenarios::{cohort_dashboard, intake_walkthrough},
};
use ihd_store::{load_snapshot, write_snapshot};

// ── CLI definition ────────────────────────────────────────────────────────────

/// IHD risk classification and cohort analytics demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "IHD risk reference runtime demo",
    long_about = "Classifies IHD risk percentages, runs the intake pipeline against a mock\n\
                  prediction service, and computes cohort dashboard views."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both reference scenarios in sequence.
    RunAll,
    /// Map a risk percentage to its tier.
    Classify {
        /// Risk percentage, nominally 0-100.
        #[arg(allow_hyphen_values = true)]
        percentage: f64,
    },
    /// Scenario 1: intake walkthrough (validation, prediction, save).
    Intake {
        /// TOML file replacing the built-in validation ranges.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Print every dashboard view as JSON.
    Analyze {
        /// Cohort snapshot (JSON array of patients). Defaults to the seed cohort.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Scatter X axis feature key.
        #[arg(long, default_value = "Age")]
        x: ScatterFeature,
        /// Scatter Y axis feature key.
        #[arg(long, default_value = "Cholesterol_Level")]
        y: ScatterFeature,
        /// Time series granularity: day, week, month or year.
        #[arg(long, default_value = "month")]
        timeframe: Timeframe,
    },
    /// Write the seed cohort to a snapshot file.
    ExportSample {
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Classify { percentage } => run_classify(percentage),
        Command::Intake { policy } => intake_walkthrough::run_scenario(policy.as_deref()),
        Command::Analyze { snapshot, x, y, timeframe } => run_analyze(snapshot, x, y, timeframe),
        Command::ExportSample { path } => run_export(path),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

fn run_all() -> IhdResult<()> {
    print_banner();
    intake_walkthrough::run_scenario(None)?;
    cohort_dashboard::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn run_classify(percentage: f64) -> IhdResult<()> {
    let tier = classify(percentage);
    println!("{}% -> {} ({})", percentage, tier.display_label(), tier.range_label());
    println!("{}", tier.description());
    Ok(())
}

fn run_analyze(
    snapshot: Option<PathBuf>,
    x: ScatterFeature,
    y: ScatterFeature,
    timeframe: Timeframe,
) -> IhdResult<()> {
    let cohort = match snapshot {
        Some(path) => load_snapshot(&path)?,
        None => seed_cohort(&UserId::new(CLINIC_USER))?,
    };

    if x == y {
        info!(feature = %x, "both axes requested the same feature; X left unselected");
    }
    let axes = ScatterAxes::new(Some(x), Some(y));

    let report = cohort_dashboard::analysis_report(&cohort, axes, timeframe)?;
    let text = serde_json::to_string_pretty(&report).map_err(|e| IhdError::SnapshotError {
        reason: format!("report does not serialize: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}

fn run_export(path: PathBuf) -> IhdResult<()> {
    let cohort = seed_cohort(&UserId::new(CLINIC_USER))?;
    write_snapshot(&path, &cohort)?;
    println!(
        "Wrote {} patients ({} records) to {}",
        cohort.patient_count(),
        cohort.record_count(),
        path.display()
    );
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("IHD Risk Reference Runtime");
    println!("==========================");
    println!();
    println!("Intake pipeline per submission:");
    println!("  [1] Vitals range-checked locally; any violation stops the submission");
    println!("  [2] Prediction requested from the (mock) risk model");
    println!("  [3] Response verified against JSON Schema + semantic rules");
    println!("  [4] Tier re-derived locally from the returned percentage");
    println!("  [5] Record appended under the (owner, first, last) patient");
    println!();
}
