//! Collaborator traits for the intake pipeline.
//!
//! The pipeline talks to four collaborators:
//!
//! - `InputValidator`: range checks run before anything leaves the process
//! - `PredictionService`: the external risk model (untrusted)
//! - `ResponseVerifier`: checks the model's answer before it is used
//! - `PatientStore`: append-only persistence, scoped per user
//!
//! `Intake` wires them together in that order.

use std::sync::Arc;

use serde_json::Value;

use ihd_contracts::{
    error::IhdResult,
    patient::{ClinicalRecord, Cohort, Patient, PatientId, UserId},
    prediction::{FieldViolation, PredictionRequest, VitalReadings},
    verify::{ResponseSchema, VerificationReport},
};

/// Range validation for intake vitals.
///
/// Must report every violation at once so the user can correct the whole
/// form in one pass. An empty vector means the vitals may be sent.
pub trait InputValidator: Send + Sync {
    fn validate(&self, vitals: &VitalReadings) -> Vec<FieldViolation>;
}

/// The external prediction endpoint.
///
/// Implementations return the raw response body. An error payload
/// (`{"error": ...}`) is a successful call from this trait's point of view;
/// `Err` is reserved for transport failures.
pub trait PredictionService: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> IhdResult<Value>;
}

/// Checks a prediction response body against a declarative schema.
pub trait ResponseVerifier: Send + Sync {
    /// Return a report with `passed = false` and populated `failures` if any
    /// rule fails. `Err` is reserved for verifier malfunctions.
    fn verify(&self, body: &Value, schema: &ResponseSchema) -> IhdResult<VerificationReport>;
}

/// Patient persistence.
///
/// Records are append-only: there is no update or delete path.
pub trait PatientStore: Send + Sync {
    /// Append `record` under the patient with `patient`'s natural key
    /// (owner, first name, last name), inserting `patient` first if no such
    /// patient exists.
    ///
    /// Lookup, insert and append happen as one step: two concurrent first
    /// saves for the same name yield one patient holding both records, and
    /// a failed save leaves no patient behind. Returns the patient's id and
    /// whether this call inserted it.
    fn append_or_create(
        &self,
        patient: Patient,
        record: ClinicalRecord,
    ) -> IhdResult<(PatientId, bool)>;

    /// Read every patient owned by `owner`, with their records.
    fn load_cohort(&self, owner: &UserId) -> IhdResult<Cohort>;
}

impl<T: PatientStore + ?Sized> PatientStore for Arc<T> {
    fn append_or_create(
        &self,
        patient: Patient,
        record: ClinicalRecord,
    ) -> IhdResult<(PatientId, bool)> {
        (**self).append_or_create(patient, record)
    }

    fn load_cohort(&self, owner: &UserId) -> IhdResult<Cohort> {
        (**self).load_cohort(owner)
    }
}
