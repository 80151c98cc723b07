//! # ihd-contracts
//!
//! Shared types, wire contracts, and errors for the IHD risk workspace.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate. Only data definitions, lenient decoding, and error types.

pub mod error;
pub mod patient;
pub mod prediction;
pub mod reading;
pub mod risk;
pub mod verify;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use error::IhdError;
    use patient::{ClinicalRecord, Cohort, Patient, Sex, StrokeHistory, UserId};
    use prediction::{FieldViolation, PredictionRequest, VitalField};
    use reading::Reading;
    use risk::RiskTier;

    // ── Reading ──────────────────────────────────────────────────────────────

    #[test]
    fn reading_parse_distinguishes_valid_invalid_missing() {
        assert_eq!(Reading::parse("25.5"), Reading::Valid(25.5));
        assert_eq!(Reading::parse("  42 "), Reading::Valid(42.0));
        assert_eq!(Reading::parse("abc"), Reading::Invalid("abc".to_string()));
        assert_eq!(Reading::parse(""), Reading::Missing);
        assert_eq!(Reading::parse("   "), Reading::Missing);
    }

    #[test]
    fn reading_rejects_non_finite_text() {
        assert!(matches!(Reading::parse("NaN"), Reading::Invalid(_)));
        assert!(matches!(Reading::parse("inf"), Reading::Invalid(_)));
    }

    #[test]
    fn reading_from_json_covers_every_shape() {
        assert_eq!(Reading::from_json(&json!(30)), Reading::Valid(30.0));
        assert_eq!(Reading::from_json(&json!("18.2")), Reading::Valid(18.2));
        assert_eq!(Reading::from_json(&json!(null)), Reading::Missing);
        assert!(matches!(Reading::from_json(&json!(true)), Reading::Invalid(_)));
        assert!(matches!(Reading::from_json(&json!({"v": 1})), Reading::Invalid(_)));
    }

    #[test]
    fn reading_nonzero_excludes_zero() {
        assert_eq!(Reading::Valid(0.0).nonzero(), None);
        assert_eq!(Reading::Valid(0.0).value(), Some(0.0));
        assert_eq!(Reading::Valid(-3.0).nonzero(), Some(-3.0));
        assert_eq!(Reading::Missing.nonzero(), None);
    }

    // ── Document decoding ────────────────────────────────────────────────────

    #[test]
    fn record_decodes_from_store_document() {
        let doc = json!({
            "blood_pressure_systolic": 135,
            "blood_pressure_diastolic": "85",
            "cholesterol_level": "n/a",
            "weight": 80,
            "height": 180,
            "BMI": 24.69,
            "history_of_stroke": "No",
            "timestamp": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "risk_result": "Moderate",
            "risk_percentage": 12.5,
            "risk_level": "Moderate Risk",
            "userid": "ignored-extra-field"
        });

        let record: ClinicalRecord = serde_json::from_value(doc).unwrap();

        assert_eq!(record.systolic, Reading::Valid(135.0));
        assert_eq!(record.diastolic, Reading::Valid(85.0));
        assert_eq!(record.cholesterol, Reading::Invalid("n/a".to_string()));
        assert_eq!(record.bmi, Reading::Valid(24.69));
        assert_eq!(record.history_of_stroke.as_deref(), Some("No"));
        assert_eq!(record.recorded_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(record.risk_result.as_deref(), Some("Moderate"));
        assert!(record.prediction.is_none());
    }

    #[test]
    fn record_decodes_with_every_field_absent() {
        let record: ClinicalRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.systolic.is_missing());
        assert!(record.recorded_at.is_none());
        assert!(record.risk_result.is_none());
    }

    #[test]
    fn timestamp_accepts_rfc3339_and_epoch_seconds() {
        let a: ClinicalRecord =
            serde_json::from_value(json!({ "timestamp": "2024-01-15T10:00:00Z" })).unwrap();
        let b: ClinicalRecord =
            serde_json::from_value(json!({ "timestamp": 1_705_312_800 })).unwrap();
        assert_eq!(a.recorded_at, b.recorded_at);

        let garbage: ClinicalRecord =
            serde_json::from_value(json!({ "timestamp": "yesterday" })).unwrap();
        assert!(garbage.recorded_at.is_none());
    }

    #[test]
    fn non_string_labels_are_dropped() {
        let patient: Patient = serde_json::from_value(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "age": "abc",
            "sex": 1,
            "userid": "user-1"
        }))
        .unwrap();

        assert!(patient.sex.is_none());
        assert!(matches!(patient.age, Reading::Invalid(_)));
        assert_eq!(patient.owner, UserId::new("user-1"));
        assert!(patient.records.is_empty());
    }

    #[test]
    fn document_store_ids_are_kept_verbatim() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "Xk3f9QpL2mNa7Rt1Bc0D",
            "firstname": "Esi",
            "lastname": "Quaye"
        }))
        .unwrap();
        assert_eq!(patient.id.to_string(), "Xk3f9QpL2mNa7Rt1Bc0D");

        let numeric: Patient = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(numeric.id.0, "42");

        let blank: Patient = serde_json::from_value(json!({ "id": null })).unwrap();
        assert!(!blank.id.0.is_empty());
    }

    #[test]
    fn null_or_malformed_records_decode_as_empty() {
        let null: Patient = serde_json::from_value(json!({ "records": null })).unwrap();
        assert!(null.records.is_empty());

        let object: Patient = serde_json::from_value(json!({ "records": { "0": {} } })).unwrap();
        assert!(object.records.is_empty());

        let mixed: Patient =
            serde_json::from_value(json!({ "records": [{ "BMI": 22 }, "junk", 7, {}] })).unwrap();
        assert_eq!(mixed.records.len(), 2);
        assert_eq!(mixed.records[0].bmi, Reading::Valid(22.0));
    }

    #[test]
    fn non_string_names_and_owner_still_decode() {
        let patient: Patient = serde_json::from_value(json!({
            "firstname": 7,
            "lastname": null,
            "userid": { "uid": "u1" }
        }))
        .unwrap();

        assert_eq!(patient.first_name, "7");
        assert_eq!(patient.last_name, "");
        assert_eq!(patient.owner, UserId::default());
    }

    #[test]
    fn same_contents_ignores_ids() {
        let doc = json!([{ "firstname": "Kojo", "lastname": "Badu", "records": [{ "BMI": 27 }] }]);
        let a: Cohort = serde_json::from_value(doc.clone()).unwrap();
        let b: Cohort = serde_json::from_value(doc).unwrap();

        assert_ne!(a, b, "missing ids are minted fresh on each decode");
        assert!(a.same_contents(&b));

        let mut c = b.clone();
        c.patients[0].records.clear();
        assert!(!a.same_contents(&c));
    }

    #[test]
    fn cohort_is_a_plain_json_array() {
        let cohort: Cohort = serde_json::from_value(json!([
            { "firstname": "A", "lastname": "B", "records": [{}, {}] },
            { "firstname": "C", "lastname": "D" }
        ]))
        .unwrap();

        assert_eq!(cohort.patient_count(), 2);
        assert_eq!(cohort.record_count(), 2);
        assert_eq!(cohort.records().count(), 2);
    }

    // ── Labels ───────────────────────────────────────────────────────────────

    #[test]
    fn labels_match_exactly() {
        assert_eq!(Sex::from_label("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_label("male"), None);
        assert_eq!(StrokeHistory::from_label("Yes"), Some(StrokeHistory::Yes));
        assert_eq!(StrokeHistory::from_label("yes"), None);
        assert_eq!(StrokeHistory::Yes.as_flag(), 1);
        assert_eq!(StrokeHistory::No.as_flag(), 0);
    }

    #[test]
    fn risk_tier_labels() {
        assert_eq!(RiskTier::from_label("Very High"), Some(RiskTier::VeryHigh));
        assert_eq!(RiskTier::from_label("Very High Risk"), None);
        assert_eq!(RiskTier::parse_any("Very High Risk"), Some(RiskTier::VeryHigh));
        assert_eq!(RiskTier::parse_any("Low"), Some(RiskTier::Low));
        assert_eq!(RiskTier::parse_any("Severe"), None);
        assert!(RiskTier::Low < RiskTier::VeryHigh);
        assert_eq!(serde_json::to_string(&RiskTier::VeryHigh).unwrap(), "\"Very High\"");
    }

    // ── Wire contract ────────────────────────────────────────────────────────

    #[test]
    fn prediction_request_uses_endpoint_keys() {
        let request = PredictionRequest {
            age: 55.0,
            systolic: 140.0,
            diastolic: 90.0,
            cholesterol: 5.2,
            bmi: 27.1,
            stroke: 1,
        };
        let value = serde_json::to_value(&request).unwrap();
        for field in VitalField::ALL {
            assert!(value.get(field.wire_key()).is_some(), "missing {}", field.wire_key());
        }
        assert_eq!(value["Stroke"], json!(1));
    }

    // ── IhdError display messages ────────────────────────────────────────────

    #[test]
    fn error_validation_display_lists_every_message() {
        let err = IhdError::Validation {
            violations: vec![
                FieldViolation {
                    field: VitalField::Age,
                    value: Reading::Valid(10.0),
                    message: "Age must be between 18 and 98 years.".to_string(),
                },
                FieldViolation {
                    field: VitalField::Bmi,
                    value: Reading::Missing,
                    message: "BMI must be between 18.02 and 36.96 kg/m².".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("input validation failed"));
        assert!(msg.contains("Age must be between"));
        assert!(msg.contains("BMI must be between"));
    }

    #[test]
    fn error_incomplete_form_display() {
        let err = IhdError::IncompleteForm {
            missing: vec!["weight".to_string(), "height".to_string()],
        };
        assert_eq!(err.to_string(), "incomplete details: missing weight, height");
    }

    #[test]
    fn error_backend_display() {
        let err = IhdError::BackendError {
            message: "Stroke must be 0 or 1.".to_string(),
        };
        assert!(err.to_string().contains("Stroke must be 0 or 1."));
    }
}
