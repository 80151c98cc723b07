//! Assembly of the reference intake pipeline.

use std::path::Path;
use std::sync::Arc;

use ihd_contracts::error::IhdResult;
use ihd_core::{traits::PredictionService, Intake};
use ihd_policy::TomlRangeValidator;
use ihd_store::InMemoryPatientStore;
use ihd_verify::{prediction_response_schema, prediction_verifier};

/// Load validation ranges from `policy`, or the built-in ranges.
pub fn range_validator(policy: Option<&Path>) -> IhdResult<TomlRangeValidator> {
    match policy {
        Some(path) => TomlRangeValidator::from_file(path),
        None => TomlRangeValidator::builtin(),
    }
}

/// An intake pipeline writing to `store`.
///
/// The caller keeps its own `Arc` to the store so it can read cohorts back
/// after the intake has taken ownership of its handle.
pub fn reference_intake(
    validator: TomlRangeValidator,
    predictor: impl PredictionService + 'static,
    store: Arc<InMemoryPatientStore>,
) -> Intake {
    Intake::new(
        Box::new(validator),
        Box::new(predictor),
        Box::new(prediction_verifier()),
        Box::new(store),
        prediction_response_schema(),
    )
}
