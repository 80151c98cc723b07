//! The intake pipeline: from a filled-in form to a saved clinical record.
//!
//! Prediction and saving are separate calls, matching the two user actions
//! (submit for prediction, then save the result):
//!
//!   predict: Validate → Request → [PredictionService] → Error payload? → Verify → Decode → Classify
//!   save:    Authenticate → Completeness → Find-or-create patient → Append record
//!
//! Nothing is sent to the prediction service unless every vital passes
//! validation, and nothing reaches the store unless a user is signed in and
//! the form is complete.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::{ClinicalRecord, Patient, PatientId, UserId},
    prediction::{
        BackendErrorBody, FieldViolation, PredictionRequest, PredictionResponse, VitalField,
        VitalReadings,
    },
    reading::Reading,
    risk::RiskTier,
    verify::ResponseSchema,
};

use crate::{
    classifier::classify,
    form::IntakeForm,
    traits::{InputValidator, PatientStore, PredictionService, ResponseVerifier},
};

/// A verified prediction, ready to be shown and optionally saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// What was sent.
    pub request: PredictionRequest,
    /// What came back, after verification.
    pub response: PredictionResponse,
    /// Tier re-derived locally from `response.percentage`.
    pub tier: RiskTier,
}

/// The result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecord {
    pub patient_id: PatientId,
    /// True if this save created the patient.
    pub created_patient: bool,
    pub record: ClinicalRecord,
}

/// Drives one user's intake against the configured collaborators.
pub struct Intake {
    validator: Box<dyn InputValidator>,
    predictor: Box<dyn PredictionService>,
    verifier: Box<dyn ResponseVerifier>,
    store: Box<dyn PatientStore>,
    schema: ResponseSchema,
}

impl Intake {
    pub fn new(
        validator: Box<dyn InputValidator>,
        predictor: Box<dyn PredictionService>,
        verifier: Box<dyn ResponseVerifier>,
        store: Box<dyn PatientStore>,
        schema: ResponseSchema,
    ) -> Self {
        Self { validator, predictor, verifier, store, schema }
    }

    /// Validate the form's vitals, request a prediction, and verify it.
    ///
    /// # Errors
    ///
    /// - `Validation` if any vital is out of range (nothing is sent)
    /// - `PredictionFailed` if the service cannot be reached
    /// - `BackendError` if the service answers with an error payload
    /// - `ResponseRejected` if the answer fails verification or decoding
    pub fn predict(&self, form: &IntakeForm) -> IhdResult<PredictionOutcome> {
        let vitals = form.vitals();

        // ── Local validation ─────────────────────────────────────────────────
        let violations = self.validator.validate(&vitals);
        if !violations.is_empty() {
            for v in &violations {
                warn!(field = %v.field, message = %v.message, "vital rejected");
            }
            return Err(IhdError::Validation { violations });
        }

        let request = build_request(&vitals, form.stroke_flag())?;
        debug!(
            age = request.age,
            bmi = request.bmi,
            stroke = request.stroke,
            "sending prediction request"
        );

        // ── Prediction call ──────────────────────────────────────────────────
        let body = self.predictor.predict(&request)?;

        if let Some(message) = error_payload(&body) {
            warn!(%message, "prediction service returned an error payload");
            return Err(IhdError::BackendError { message });
        }

        // ── Response verification ────────────────────────────────────────────
        let report = self.verifier.verify(&body, &self.schema)?;
        if !report.passed {
            let reason = report.summary();
            warn!(schema_id = %self.schema.schema_id, %reason, "prediction response rejected");
            return Err(IhdError::ResponseRejected { reason });
        }

        let response: PredictionResponse =
            serde_json::from_value(body).map_err(|e| IhdError::ResponseRejected {
                reason: format!("response does not decode: {e}"),
            })?;

        // ── Local classification ─────────────────────────────────────────────
        let tier = classify(response.percentage);
        if RiskTier::parse_any(&response.risk_level) != Some(tier) {
            warn!(
                percentage = response.percentage,
                service_level = %response.risk_level,
                local_tier = %tier,
                "service risk level disagrees with local classification"
            );
        }

        info!(percentage = response.percentage, tier = %tier, "prediction completed");

        Ok(PredictionOutcome { request, response, tier })
    }

    /// Save a prediction under the form's patient, creating the patient on
    /// first save.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if `user` is `None`
    /// - `IncompleteForm` if any required field is empty
    /// - `StoreError` if the store fails
    pub fn save(
        &self,
        user: Option<&UserId>,
        form: &IntakeForm,
        outcome: &PredictionOutcome,
    ) -> IhdResult<SavedRecord> {
        let owner = user.ok_or(IhdError::Unauthenticated)?;

        let missing = form.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "refusing to save incomplete form");
            return Err(IhdError::IncompleteForm { missing });
        }

        let now = Utc::now();

        let patient = Patient {
            id: PatientId::new(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            age: whole_years(&form.age),
            sex: Some(form.sex.clone()),
            owner: owner.clone(),
            created_at: Some(now),
            records: Vec::new(),
        };

        let record = ClinicalRecord {
            systolic: Reading::parse(&form.systolic),
            diastolic: Reading::parse(&form.diastolic),
            cholesterol: Reading::parse(&form.cholesterol),
            weight: Reading::parse(&form.weight),
            height: Reading::parse(&form.height),
            bmi: form.bmi().map(Reading::Valid).unwrap_or_default(),
            history_of_stroke: Some(form.history_of_stroke.clone()),
            recorded_at: Some(now),
            risk_result: Some(outcome.tier.label().to_string()),
            risk_percentage: Reading::from(outcome.response.percentage),
            risk_level: Some(outcome.response.risk_level.clone()),
            prediction: Some(outcome.response.prediction.clone()),
        };

        let (patient_id, created_patient) = self.store.append_or_create(patient, record.clone())?;
        if created_patient {
            info!(patient_id = %patient_id, owner = %owner, "created patient");
        } else {
            debug!(patient_id = %patient_id, "appended to existing patient");
        }
        info!(patient_id = %patient_id, tier = %outcome.tier, "record saved");

        Ok(SavedRecord { patient_id, created_patient, record })
    }

    /// `predict` followed by `save`.
    pub fn submit(&self, user: Option<&UserId>, form: &IntakeForm) -> IhdResult<SavedRecord> {
        let outcome = self.predict(form)?;
        self.save(user, form, &outcome)
    }
}

/// Build the request body. Every vital must already be valid; a validator
/// that lets a missing value through still cannot produce a request.
fn build_request(vitals: &VitalReadings, stroke: u8) -> IhdResult<PredictionRequest> {
    let require = |field: VitalField| -> IhdResult<f64> {
        let reading = vitals.get(field);
        reading.value().ok_or_else(|| IhdError::Validation {
            violations: vec![FieldViolation {
                field,
                value: reading.clone(),
                message: format!("{} is required.", field.wire_key()),
            }],
        })
    };

    Ok(PredictionRequest {
        age: require(VitalField::Age)?,
        systolic: require(VitalField::Systolic)?,
        diastolic: require(VitalField::Diastolic)?,
        cholesterol: require(VitalField::Cholesterol)?,
        bmi: require(VitalField::Bmi)?,
        stroke,
    })
}

fn error_payload(body: &Value) -> Option<String> {
    serde_json::from_value::<BackendErrorBody>(body.clone())
        .ok()
        .map(|b| b.error)
}

/// Patient age is stored in whole years.
fn whole_years(raw: &str) -> Reading {
    match Reading::parse(raw) {
        Reading::Valid(v) => Reading::Valid(v.trunc()),
        other => other,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use ihd_contracts::{
        error::{IhdError, IhdResult},
        patient::{ClinicalRecord, Cohort, Patient, PatientId, UserId},
        prediction::{FieldViolation, PredictionRequest, VitalField, VitalReadings},
        reading::Reading,
        risk::RiskTier,
        verify::{ResponseSchema, VerificationFailure, VerificationReport},
    };

    use crate::form::IntakeForm;
    use crate::traits::{InputValidator, PatientStore, PredictionService, ResponseVerifier};

    use super::Intake;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn form() -> IntakeForm {
        IntakeForm {
            first_name: "Kwame".to_string(),
            last_name: "Mensah".to_string(),
            age: "61".to_string(),
            sex: "Male".to_string(),
            systolic: "150".to_string(),
            diastolic: "95".to_string(),
            cholesterol: "6.1".to_string(),
            weight: "88".to_string(),
            height: "176".to_string(),
            history_of_stroke: "Yes".to_string(),
        }
    }

    fn schema() -> ResponseSchema {
        ResponseSchema {
            schema_id: "test-schema-v1".to_string(),
            json_schema: serde_json::Value::Null,
            rules: vec![],
        }
    }

    /// A validator that returns a fixed set of violations.
    struct MockValidator {
        violations: Vec<FieldViolation>,
    }

    impl InputValidator for MockValidator {
        fn validate(&self, _vitals: &VitalReadings) -> Vec<FieldViolation> {
            self.violations.clone()
        }
    }

    /// A prediction service that replies with a canned body and counts calls.
    struct MockPredictor {
        body: serde_json::Value,
        calls: Arc<Mutex<Vec<PredictionRequest>>>,
    }

    impl PredictionService for MockPredictor {
        fn predict(&self, request: &PredictionRequest) -> IhdResult<serde_json::Value> {
            self.calls.lock().unwrap().push(request.clone());
            Ok(self.body.clone())
        }
    }

    /// A verifier that can be configured to pass or fail.
    struct MockVerifier {
        pass: bool,
    }

    impl ResponseVerifier for MockVerifier {
        fn verify(
            &self,
            _body: &serde_json::Value,
            _schema: &ResponseSchema,
        ) -> IhdResult<VerificationReport> {
            if self.pass {
                Ok(VerificationReport { passed: true, failures: vec![] })
            } else {
                Ok(VerificationReport {
                    passed: false,
                    failures: vec![VerificationFailure {
                        rule_id: "percentage-range".to_string(),
                        message: "field 'percentage' is out of range".to_string(),
                    }],
                })
            }
        }
    }

    /// A store that keeps patients in a vector.
    #[derive(Default)]
    struct MockStore {
        patients: Mutex<Vec<Patient>>,
    }

    impl PatientStore for MockStore {
        fn append_or_create(
            &self,
            patient: Patient,
            record: ClinicalRecord,
        ) -> IhdResult<(PatientId, bool)> {
            let mut patients = self.patients.lock().unwrap();
            if let Some(existing) = patients
                .iter_mut()
                .find(|p| p.has_natural_key(&patient.owner, &patient.first_name, &patient.last_name))
            {
                existing.records.push(record);
                return Ok((existing.id.clone(), false));
            }
            let id = patient.id.clone();
            patients.push(Patient { records: vec![record], ..patient });
            Ok((id, true))
        }

        fn load_cohort(&self, owner: &UserId) -> IhdResult<Cohort> {
            Ok(Cohort::new(
                self.patients
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|p| &p.owner == owner)
                    .cloned()
                    .collect(),
            ))
        }
    }

    struct Harness {
        intake: Intake,
        calls: Arc<Mutex<Vec<PredictionRequest>>>,
        store: Arc<MockStore>,
    }

    fn harness(violations: Vec<FieldViolation>, body: serde_json::Value, pass: bool) -> Harness {
        let calls = Arc::new(Mutex::new(vec![]));
        let store = Arc::new(MockStore::default());
        let intake = Intake::new(
            Box::new(MockValidator { violations }),
            Box::new(MockPredictor { body, calls: Arc::clone(&calls) }),
            Box::new(MockVerifier { pass }),
            Box::new(Arc::clone(&store)),
            schema(),
        );
        Harness { intake, calls, store }
    }

    fn ok_body() -> serde_json::Value {
        json!({ "prediction": "susceptible", "percentage": 23.4, "risk_level": "High Risk" })
    }

    // ── predict ──────────────────────────────────────────────────────────────

    #[test]
    fn valid_form_produces_outcome_with_local_tier() {
        let h = harness(vec![], ok_body(), true);

        let outcome = h.intake.predict(&form()).unwrap();

        assert_eq!(outcome.tier, RiskTier::High);
        assert_eq!(outcome.response.percentage, 23.4);
        assert_eq!(outcome.request.stroke, 1);
        assert_eq!(outcome.request.bmi, 28.41);
        assert_eq!(h.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn violations_block_the_request() {
        let violation = FieldViolation {
            field: VitalField::Age,
            value: Reading::Valid(12.0),
            message: "Age must be between 18 and 98 years.".to_string(),
        };
        let h = harness(vec![violation], ok_body(), true);

        let result = h.intake.predict(&form());

        match result {
            Err(IhdError::Validation { violations }) => assert_eq!(violations.len(), 1),
            other => panic!("expected Validation, got {:?}", other),
        }
        assert!(h.calls.lock().unwrap().is_empty(), "nothing may be sent on violation");
    }

    #[test]
    fn missing_vital_cannot_be_sent_even_if_validator_allows_it() {
        let h = harness(vec![], ok_body(), true);
        let mut f = form();
        f.cholesterol.clear();

        match h.intake.predict(&f) {
            Err(IhdError::Validation { violations }) => {
                assert_eq!(violations[0].field, VitalField::Cholesterol);
            }
            other => panic!("expected Validation, got {:?}", other),
        }
        assert!(h.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn error_payload_becomes_backend_error() {
        let h = harness(vec![], json!({ "error": "Stroke must be 0 or 1." }), true);

        match h.intake.predict(&form()) {
            Err(IhdError::BackendError { message }) => assert_eq!(message, "Stroke must be 0 or 1."),
            other => panic!("expected BackendError, got {:?}", other),
        }
    }

    #[test]
    fn failed_verification_rejects_response() {
        let h = harness(vec![], ok_body(), false);

        match h.intake.predict(&form()) {
            Err(IhdError::ResponseRejected { reason }) => {
                assert!(reason.contains("percentage-range"), "reason: {reason}");
            }
            other => panic!("expected ResponseRejected, got {:?}", other),
        }
    }

    #[test]
    fn undecodable_response_is_rejected() {
        let h = harness(vec![], json!({ "prediction": 3 }), true);
        assert!(matches!(
            h.intake.predict(&form()),
            Err(IhdError::ResponseRejected { .. })
        ));
    }

    // ── save ─────────────────────────────────────────────────────────────────

    #[test]
    fn save_requires_a_user() {
        let h = harness(vec![], ok_body(), true);
        let outcome = h.intake.predict(&form()).unwrap();

        assert!(matches!(
            h.intake.save(None, &form(), &outcome),
            Err(IhdError::Unauthenticated)
        ));
        assert!(h.store.patients.lock().unwrap().is_empty());
    }

    #[test]
    fn save_rejects_incomplete_form() {
        let h = harness(vec![], ok_body(), true);
        let outcome = h.intake.predict(&form()).unwrap();
        let mut f = form();
        f.sex.clear();

        match h.intake.save(Some(&UserId::new("u1")), &f, &outcome) {
            Err(IhdError::IncompleteForm { missing }) => assert_eq!(missing, vec!["sex"]),
            other => panic!("expected IncompleteForm, got {:?}", other),
        }
    }

    #[test]
    fn first_save_creates_patient_second_appends() {
        let h = harness(vec![], ok_body(), true);
        let user = UserId::new("u1");

        let first = h.intake.submit(Some(&user), &form()).unwrap();
        let second = h.intake.submit(Some(&user), &form()).unwrap();

        assert!(first.created_patient);
        assert!(!second.created_patient);
        assert_eq!(first.patient_id, second.patient_id);

        let cohort = h.store.load_cohort(&user).unwrap();
        assert_eq!(cohort.patient_count(), 1);
        assert_eq!(cohort.record_count(), 2);
    }

    #[test]
    fn concurrent_first_saves_share_one_patient() {
        let h = harness(vec![], ok_body(), true);
        let user = UserId::new("u1");
        let outcome = h.intake.predict(&form()).unwrap();

        let saved: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| h.intake.save(Some(&user), &form(), &outcome)))
                .collect();
            handles.into_iter().map(|t| t.join().unwrap().unwrap()).collect()
        });

        assert_eq!(saved.iter().filter(|s| s.created_patient).count(), 1);
        assert!(saved.iter().all(|s| s.patient_id == saved[0].patient_id));

        let cohort = h.store.load_cohort(&user).unwrap();
        assert_eq!(cohort.patient_count(), 1);
        assert_eq!(cohort.record_count(), 4);
    }

    #[test]
    fn same_name_under_another_user_is_a_different_patient() {
        let h = harness(vec![], ok_body(), true);

        let a = h.intake.submit(Some(&UserId::new("u1")), &form()).unwrap();
        let b = h.intake.submit(Some(&UserId::new("u2")), &form()).unwrap();

        assert!(a.created_patient && b.created_patient);
        assert_ne!(a.patient_id, b.patient_id);
    }

    #[test]
    fn saved_record_carries_derived_bmi_and_outcome() {
        let h = harness(vec![], ok_body(), true);

        let saved = h.intake.submit(Some(&UserId::new("u1")), &form()).unwrap();
        let record = saved.record;

        assert_eq!(record.bmi, Reading::Valid(28.41));
        assert_eq!(record.risk_result.as_deref(), Some("High"));
        assert_eq!(record.risk_level.as_deref(), Some("High Risk"));
        assert_eq!(record.prediction.as_deref(), Some("susceptible"));
        assert_eq!(record.risk_percentage, Reading::Valid(23.4));
        assert!(record.recorded_at.is_some());
    }

    #[test]
    fn patient_age_is_stored_in_whole_years() {
        let h = harness(vec![], ok_body(), true);
        let user = UserId::new("u1");
        let mut f = form();
        f.age = "61.8".to_string();

        h.intake.submit(Some(&user), &f).unwrap();

        let cohort = h.store.load_cohort(&user).unwrap();
        assert_eq!(cohort.patients[0].age, Reading::Valid(61.0));
        assert_eq!(cohort.patients[0].sex.as_deref(), Some("Male"));
    }
}
