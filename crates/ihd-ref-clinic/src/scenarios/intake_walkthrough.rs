//! Scenario 1: Intake walkthrough
//!
//! Walks one clinician through the intake pipeline:
//!   1. A form with out-of-range vitals is rejected locally; nothing is sent
//!   2. A valid form is predicted, but saving without a signed-in user fails
//!   3. The same form saved by the clinician creates the patient
//!   4. A second visit appends a record to the same patient
//!   5. An unreachable prediction service surfaces as a transport error

use std::path::Path;
use std::sync::Arc;

use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::UserId,
};
use ihd_core::traits::PatientStore;
use ihd_store::InMemoryPatientStore;

use crate::{
    mock_data::{out_of_range_form, sample_form, MockPredictionService, CLINIC_USER},
    runtime::{range_validator, reference_intake},
};

/// Run the walkthrough. `policy` replaces the built-in validation ranges.
pub fn run_scenario(policy: Option<&Path>) -> IhdResult<()> {
    println!("=== Scenario 1: Intake Walkthrough ===");
    println!();

    let store = Arc::new(InMemoryPatientStore::new());
    let intake = reference_intake(
        range_validator(policy)?,
        MockPredictionService::new(),
        Arc::clone(&store),
    );
    let clinician = UserId::new(CLINIC_USER);

    // ── Step 1: out-of-range vitals ──────────────────────────────────────────

    println!("  [1] Submitting a form with age 16 and systolic 230");
    match intake.predict(&out_of_range_form()) {
        Err(IhdError::Validation { violations }) => {
            for v in &violations {
                println!("      rejected {}: {}", v.field, v.message);
            }
            println!("      Nothing was sent to the prediction service.");
        }
        Ok(outcome) => println!("      UNEXPECTED: predicted {}", outcome.tier),
        Err(e) => return Err(e),
    }
    println!();

    // ── Step 2: anonymous save ───────────────────────────────────────────────

    let form = sample_form();
    println!(
        "  [2] Submitting {} {} (BMI {})",
        form.first_name,
        form.last_name,
        form.bmi().map_or_else(|| "n/a".to_string(), |b| format!("{b:.2}"))
    );
    let outcome = intake.predict(&form)?;
    println!(
        "      {}% -> {} ({}), service said '{}'",
        outcome.response.percentage,
        outcome.tier.display_label(),
        outcome.tier.range_label(),
        outcome.response.risk_level
    );
    println!("      {}", outcome.tier.description());

    match intake.save(None, &form, &outcome) {
        Err(IhdError::Unauthenticated) => println!("      Save without a user: refused"),
        other => println!("      UNEXPECTED save result: {:?}", other.map(|s| s.patient_id)),
    }
    println!();

    // ── Step 3 & 4: first and second visit ───────────────────────────────────

    println!("  [3] Saving as {}", clinician);
    let first = intake.save(Some(&clinician), &form, &outcome)?;
    println!(
        "      patient {} {}",
        first.patient_id,
        if first.created_patient { "created" } else { "reused" }
    );

    println!("  [4] Second visit with lower blood pressure");
    let mut revisit = form.clone();
    revisit.systolic = "132".to_string();
    revisit.diastolic = "84".to_string();
    let second = intake.submit(Some(&clinician), &revisit)?;
    println!(
        "      patient {} {}, tier {}",
        second.patient_id,
        if second.created_patient { "created" } else { "reused" },
        second.record.risk_result.as_deref().unwrap_or("-")
    );

    let cohort = store.load_cohort(&clinician)?;
    println!(
        "      store now holds {} patient(s), {} record(s)",
        cohort.patient_count(),
        cohort.record_count()
    );
    println!();

    // ── Step 5: transport failure ────────────────────────────────────────────

    println!("  [5] Prediction service down");
    let offline = reference_intake(
        range_validator(policy)?,
        MockPredictionService::unreachable(),
        Arc::clone(&store),
    );
    match offline.predict(&form) {
        Err(e @ IhdError::PredictionFailed { .. }) => println!("      {}", e),
        other => println!("      UNEXPECTED: {:?}", other.map(|o| o.tier)),
    }
    println!();

    Ok(())
}
