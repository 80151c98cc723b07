//! Simulated clinic data and a stand-in prediction service.
//!
//! Everything here is fictional. The seed cohort is written in the
//! document-store shape and includes values a real store accumulates over
//! time: numbers saved as strings, unparsable entries, a zero BMI, missing
//! timestamps, and labels with the wrong case.

use serde_json::{json, Value};
use tracing::{debug, warn};

use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::{Cohort, UserId},
    prediction::PredictionRequest,
};
use ihd_core::{classify, round2, traits::PredictionService, IntakeForm};

// ── Seed cohort ──────────────────────────────────────────────────────────────

/// The clinician account that owns the seed cohort.
pub const CLINIC_USER: &str = "clinic-demo-user";

fn seed_documents(owner: &str) -> Value {
    json!([
        {
            "id": "6f1c2a4e-0b7d-4c1e-9a51-2d3e4f5a6b01",
            "firstname": "Ama", "lastname": "Boateng", "age": 47, "sex": "Female",
            "userid": owner, "createdAt": "2023-11-28T09:12:00Z",
            "records": [
                { "blood_pressure_systolic": "132", "blood_pressure_diastolic": "84",
                  "cholesterol_level": "5.2", "weight": "68", "height": "162", "BMI": 25.91,
                  "history_of_stroke": "No", "timestamp": { "seconds": 1701162720, "nanoseconds": 0 },
                  "risk_result": "Moderate", "risk_percentage": 12.4,
                  "risk_level": "Moderate Risk", "prediction": "susceptible" },
                { "blood_pressure_systolic": 128, "blood_pressure_diastolic": 82,
                  "cholesterol_level": 4.9, "weight": 66, "height": 162, "BMI": 25.15,
                  "history_of_stroke": "No", "timestamp": "2024-01-09T10:30:00Z",
                  "risk_result": "Moderate", "risk_percentage": 11.02,
                  "risk_level": "Moderate Risk", "prediction": "susceptible" }
            ]
        },
        {
            "id": "6f1c2a4e-0b7d-4c1e-9a51-2d3e4f5a6b02",
            "firstname": "Kwame", "lastname": "Mensah", "age": "63", "sex": "Male",
            "userid": owner, "createdAt": "2023-12-14T15:00:00Z",
            "records": [
                { "blood_pressure_systolic": 158, "blood_pressure_diastolic": 96,
                  "cholesterol_level": 6.8, "weight": 92, "height": 175, "BMI": 30.04,
                  "history_of_stroke": "Yes", "timestamp": "2023-12-14T15:05:00Z",
                  "risk_result": "High", "risk_percentage": 24.7,
                  "risk_level": "High Risk", "prediction": "susceptible" },
                { "blood_pressure_systolic": 162, "blood_pressure_diastolic": "n/a",
                  "cholesterol_level": 7.1, "weight": 95, "height": 175, "BMI": 31.02,
                  "history_of_stroke": "Yes", "timestamp": "2024-02-20T08:45:00Z",
                  "risk_result": "Very High", "risk_percentage": 31.5,
                  "risk_level": "Very High Risk", "prediction": "susceptible" }
            ]
        },
        {
            "id": "6f1c2a4e-0b7d-4c1e-9a51-2d3e4f5a6b03",
            "firstname": "Efua", "lastname": "Owusu", "age": 20, "sex": "Female",
            "userid": owner, "createdAt": "2024-02-02T11:00:00Z",
            "records": [
                { "blood_pressure_systolic": 112, "blood_pressure_diastolic": 72,
                  "cholesterol_level": "", "weight": 52, "height": 168, "BMI": 18.42,
                  "history_of_stroke": "No", "timestamp": "2024-02-02T11:04:00Z",
                  "risk_result": "Low", "risk_percentage": 2.1,
                  "risk_level": "Low Risk", "prediction": "susceptible" }
            ]
        },
        {
            "id": "6f1c2a4e-0b7d-4c1e-9a51-2d3e4f5a6b04",
            "firstname": "Yaw", "lastname": "Asante", "age": 81, "sex": "male",
            "userid": owner, "createdAt": null,
            "records": [
                { "blood_pressure_systolic": 145, "blood_pressure_diastolic": 88,
                  "cholesterol_level": 5.9, "weight": "", "height": "", "BMI": 0,
                  "history_of_stroke": "no", "timestamp": null,
                  "risk_result": "high", "risk_percentage": "22",
                  "risk_level": "High Risk", "prediction": "susceptible" }
            ]
        },
        {
            "id": "6f1c2a4e-0b7d-4c1e-9a51-2d3e4f5a6b05",
            "firstname": "Abena", "lastname": "Darko", "age": "unknown", "sex": "Female",
            "userid": owner, "createdAt": "2024-03-05T13:20:00Z",
            "records": []
        }
    ])
}

/// The fictional cohort used by the dashboard scenario and `export-sample`.
pub fn seed_cohort(owner: &UserId) -> IhdResult<Cohort> {
    serde_json::from_value(seed_documents(&owner.0)).map_err(|e| IhdError::SnapshotError {
        reason: format!("seed cohort does not decode: {}", e),
    })
}

/// A complete intake for a returning patient.
pub fn sample_form() -> IntakeForm {
    IntakeForm {
        first_name: "Kofi".to_string(),
        last_name: "Adjei".to_string(),
        age: "58".to_string(),
        sex: "Male".to_string(),
        systolic: "148".to_string(),
        diastolic: "92".to_string(),
        cholesterol: "6.2".to_string(),
        weight: "84".to_string(),
        height: "172".to_string(),
        history_of_stroke: "No".to_string(),
    }
}

/// An intake with two vitals out of range.
pub fn out_of_range_form() -> IntakeForm {
    IntakeForm {
        age: "16".to_string(),
        systolic: "230".to_string(),
        ..sample_form()
    }
}

// ── Prediction service (mock) ─────────────────────────────────────────────────

/// A deterministic stand-in for the external risk model.
///
/// Checks the body the same way the real endpoint does (every field
/// present, Stroke 0 or 1, no negative numbers) and answers with an error
/// payload when a check fails. Otherwise it scores the vitals with a fixed
/// logistic model and halves the probability, as the real endpoint does.
pub struct MockPredictionService {
    reachable: bool,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self { reachable: true }
    }

    /// A service whose every call fails at the transport level.
    pub fn unreachable() -> Self {
        Self { reachable: false }
    }

    /// The response body for a raw request body.
    pub fn respond(body: &Value) -> Value {
        const REQUIRED: [&str; 6] = ["Stroke", "BP_Syst", "BP_Dias", "Chol", "Age", "BMI"];

        let missing: Vec<&str> = REQUIRED.iter().copied().filter(|k| body.get(k).is_none()).collect();
        if !missing.is_empty() {
            return json!({ "error": format!("Missing fields in input data: {}", missing.join(", ")) });
        }

        let stroke = match body["Stroke"].as_u64() {
            Some(s @ (0 | 1)) => s as f64,
            _ => return json!({ "error": "Stroke must be 0 or 1." }),
        };

        let mut values = [0.0_f64; 5];
        for (slot, key) in values.iter_mut().zip(["BP_Syst", "BP_Dias", "Chol", "Age", "BMI"]) {
            match body[key].as_f64() {
                Some(v) if v >= 0.0 => *slot = v,
                Some(_) => {
                    return json!({ "error": "Invalid input type or value: BP_Syst, BP_Dias, Chol, Age, and BMI must be non-negative numbers." })
                }
                None => return json!({ "error": format!("Invalid input type or value: {key} is not a number") }),
            }
        }
        let [systolic, diastolic, cholesterol, age, bmi] = values;

        let z = -7.2
            + 0.065 * age
            + 0.018 * (systolic - 120.0)
            + 0.022 * (diastolic - 80.0)
            + 0.38 * cholesterol
            + 0.06 * (bmi - 25.0)
            + 1.1 * stroke;
        let probability = 1.0 / (1.0 + (-z).exp());
        let percentage = round2(probability * 100.0 / 2.0);

        let prediction = if percentage == 0.0 { "not susceptible" } else { "susceptible" };
        json!({
            "prediction": prediction,
            "percentage": percentage,
            "risk_level": classify(percentage).display_label(),
        })
    }
}

impl Default for MockPredictionService {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionService for MockPredictionService {
    fn predict(&self, request: &PredictionRequest) -> IhdResult<Value> {
        if !self.reachable {
            warn!("prediction service unreachable");
            return Err(IhdError::PredictionFailed {
                reason: "connection refused by prediction endpoint".to_string(),
            });
        }

        let body = serde_json::to_value(request).map_err(|e| IhdError::PredictionFailed {
            reason: format!("request does not serialize: {}", e),
        })?;
        let response = Self::respond(&body);
        debug!(%response, "mock prediction response");
        Ok(response)
    }
}
