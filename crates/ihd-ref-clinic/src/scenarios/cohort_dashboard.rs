//! Scenario 2: Cohort dashboard
//!
//! Loads the seed cohort through the patient store and renders the
//! dashboard views as text:
//!   1. Age, gender, BMI and risk histograms
//!   2. Vital averages, with "no data" kept distinct from zero
//!   3. Time series for two timeframes (a lookup, no recomputation)
//!   4. Scatter cloud before and after an axis change

use serde_json::{json, Value};

use ihd_analytics::{
    views::{CohortViews, NamedCount},
    CohortDashboard, ScatterAxes, ScatterFeature, Timeframe,
};
use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::{Cohort, UserId},
};
use ihd_core::traits::PatientStore;
use ihd_store::InMemoryPatientStore;

use crate::mock_data::{seed_cohort, CLINIC_USER};

/// The JSON document printed by `analyze`: every view plus the series for
/// the chosen timeframe.
pub fn analysis_report(cohort: &Cohort, axes: ScatterAxes, timeframe: Timeframe) -> IhdResult<Value> {
    let mut dashboard = CohortDashboard::new();
    dashboard.set_axes(axes);
    dashboard.set_timeframe(timeframe);

    let views = serde_json::to_value(dashboard.views(cohort)).map_err(|e| IhdError::SnapshotError {
        reason: format!("views do not serialize: {}", e),
    })?;
    let series = serde_json::to_value(dashboard.time_series(cohort)).map_err(|e| {
        IhdError::SnapshotError { reason: format!("time series does not serialize: {}", e) }
    })?;

    Ok(json!({
        "timeframe": timeframe.label(),
        "scatterAxes": {
            "x": axes.x().map(|f| f.key()),
            "y": axes.y().map(|f| f.key()),
        },
        "timeSeries": series,
        "views": views,
    }))
}

fn tally_line(tally: &[NamedCount]) -> String {
    tally
        .iter()
        .map(|c| format!("{} {}", c.name, c.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn average(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.2}"))
}

fn print_views(views: &CohortViews) {
    let ages: Vec<String> = views.age_data.iter().map(|b| format!("{} {}", b.age_range, b.count)).collect();
    println!("      age:       {}", ages.join(", "));
    println!("      gender:    {}", tally_line(&views.gender_data));
    println!(
        "      BMI:       average {} over {} reading(s); {}",
        average(views.bmi_data.average),
        views.bmi_data.samples,
        tally_line(&views.bmi_data.categories)
    );
    println!("      risk:      {}", tally_line(&views.risk_data));

    let m = &views.health_metrics;
    println!(
        "      averages:  systolic {}, diastolic {}, cholesterol {}",
        average(m.average_systolic),
        average(m.average_diastolic),
        average(m.average_cholesterol)
    );
    println!("      stroke:    {}", tally_line(&m.history_of_stroke));
}

/// Run the dashboard scenario over the seed cohort.
pub fn run_scenario() -> IhdResult<()> {
    println!("=== Scenario 2: Cohort Dashboard ===");
    println!();

    let clinician = UserId::new(CLINIC_USER);
    let store = InMemoryPatientStore::from_cohort(seed_cohort(&clinician)?);
    let cohort = store.load_cohort(&clinician)?;

    let mut dashboard = CohortDashboard::new();

    // ── Step 1 & 2: histograms and averages ──────────────────────────────────

    let views = dashboard.views(&cohort);
    println!(
        "  [1] {} patients, {} records",
        views.summary_data.total_patients, views.summary_data.total_records
    );
    print_views(views);
    println!();

    // ── Step 3: timeframes ───────────────────────────────────────────────────

    for timeframe in [Timeframe::Month, Timeframe::Week] {
        dashboard.set_timeframe(timeframe);
        let series: Vec<String> = dashboard
            .time_series(&cohort)
            .iter()
            .map(|p| format!("{} {}", p.period, p.count))
            .collect();
        println!("  [2] per {}: {}", timeframe.label().to_lowercase(), series.join(", "));
    }
    println!();

    // ── Step 4: scatter axes ─────────────────────────────────────────────────

    let axes = dashboard.axes();
    println!(
        "  [3] scatter {} vs {}: {} point(s)",
        axes.x().map_or("-", |f| f.label()),
        axes.y().map_or("-", |f| f.label()),
        dashboard.views(&cohort).scatter_data.len()
    );

    dashboard.select_x(ScatterFeature::Cholesterol);
    let axes = dashboard.axes();
    println!(
        "      X set to {}: Y is now {}, {} point(s)",
        ScatterFeature::Cholesterol.label(),
        axes.y().map_or("unselected", |f| f.label()),
        dashboard.views(&cohort).scatter_data.len()
    );

    dashboard.select_y(ScatterFeature::Bmi);
    println!(
        "      Y set to {}: {} point(s)",
        ScatterFeature::Bmi.label(),
        dashboard.views(&cohort).scatter_data.len()
    );
    println!("      views computed {} time(s)", dashboard.recomputations());
    println!();

    Ok(())
}
