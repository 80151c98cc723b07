//! Intake vitals and the prediction service wire contract.
//!
//! The request and response shapes are fixed by the external prediction
//! endpoint, hence the upper-case JSON keys.

use serde::{Deserialize, Serialize};

use crate::reading::Reading;

/// A vital sign that is range-checked before a prediction request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalField {
    Age,
    Systolic,
    Diastolic,
    Cholesterol,
    Bmi,
}

impl VitalField {
    pub const ALL: [VitalField; 5] = [
        Self::Age,
        Self::Systolic,
        Self::Diastolic,
        Self::Cholesterol,
        Self::Bmi,
    ];

    /// Name used in configuration files and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Systolic => "systolic",
            Self::Diastolic => "diastolic",
            Self::Cholesterol => "cholesterol",
            Self::Bmi => "bmi",
        }
    }

    /// Key used by the prediction endpoint.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Systolic => "BP_Syst",
            Self::Diastolic => "BP_Dias",
            Self::Cholesterol => "Chol",
            Self::Bmi => "BMI",
        }
    }
}

impl std::fmt::Display for VitalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The five range-checked vitals, parsed from form input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VitalReadings {
    pub age: Reading,
    pub systolic: Reading,
    pub diastolic: Reading,
    pub cholesterol: Reading,
    pub bmi: Reading,
}

impl VitalReadings {
    pub fn get(&self, field: VitalField) -> &Reading {
        match field {
            VitalField::Age => &self.age,
            VitalField::Systolic => &self.systolic,
            VitalField::Diastolic => &self.diastolic,
            VitalField::Cholesterol => &self.cholesterol,
            VitalField::Bmi => &self.bmi,
        }
    }
}

/// A single out-of-range or unparsable vital, reported back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: VitalField,
    pub value: Reading,
    pub message: String,
}

/// Body of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "BP_Syst")]
    pub systolic: f64,
    #[serde(rename = "BP_Dias")]
    pub diastolic: f64,
    #[serde(rename = "Chol")]
    pub cholesterol: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// `1` if the patient has a history of stroke, else `0`.
    #[serde(rename = "Stroke")]
    pub stroke: u8,
}

/// Body of a successful prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Susceptibility string, e.g. `"susceptible"`.
    pub prediction: String,
    /// Risk percentage in [0, 100].
    pub percentage: f64,
    /// Risk level description, e.g. `"Moderate Risk"`.
    pub risk_level: String,
}

/// Body the prediction endpoint returns on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendErrorBody {
    pub error: String,
}
