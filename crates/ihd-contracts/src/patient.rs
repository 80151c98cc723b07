//! Patient, clinical record, and cohort types.
//!
//! Field names follow the stored document shape so a snapshot exported from
//! the document store deserializes directly. Every numeric field is a
//! [`Reading`]; labels are kept as raw strings and matched exactly by the
//! code that consumes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::reading::{lenient_label, lenient_text, lenient_timestamp, Reading};

/// Stable identifier for a patient document.
///
/// Ids minted here are v4 UUIDs. Ids read back from the document store are
/// kept verbatim, whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

impl PatientId {
    /// Create a new, unique patient ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated account that owns a set of patients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Biological sex as captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Exact, case-sensitive match on the stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Whether the patient has a history of stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeHistory {
    Yes,
    No,
}

impl StrokeHistory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Exact, case-sensitive match on the stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    /// `1` for a recorded stroke, `0` otherwise.
    pub fn as_flag(&self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 0,
        }
    }
}

/// One time-stamped set of vitals plus the prediction made from them.
///
/// Records are append-only. `bmi` is always derived from `weight` and
/// `height` when a record is created through the intake pipeline; it is a
/// plain field here only because stored documents carry it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClinicalRecord {
    /// Systolic blood pressure, mmHg.
    #[serde(rename = "blood_pressure_systolic", default)]
    pub systolic: Reading,

    /// Diastolic blood pressure, mmHg.
    #[serde(rename = "blood_pressure_diastolic", default)]
    pub diastolic: Reading,

    /// Total cholesterol, mmol/L.
    #[serde(rename = "cholesterol_level", default)]
    pub cholesterol: Reading,

    /// Body weight, kg.
    #[serde(default)]
    pub weight: Reading,

    /// Height, cm.
    #[serde(default)]
    pub height: Reading,

    /// Body mass index, kg/m².
    #[serde(rename = "BMI", default)]
    pub bmi: Reading,

    /// `"Yes"` / `"No"`; anything else is kept but never counted.
    #[serde(default, deserialize_with = "lenient_label")]
    pub history_of_stroke: Option<String>,

    /// Assigned at save time.
    #[serde(rename = "timestamp", default, deserialize_with = "lenient_timestamp")]
    pub recorded_at: Option<DateTime<Utc>>,

    /// Short risk tier label ("Low", "Moderate", "High", "Very High").
    #[serde(default, deserialize_with = "lenient_label")]
    pub risk_result: Option<String>,

    /// Risk percentage returned by the prediction service.
    #[serde(default)]
    pub risk_percentage: Reading,

    /// Risk level description returned by the prediction service.
    #[serde(default, deserialize_with = "lenient_label")]
    pub risk_level: Option<String>,

    /// Susceptibility string returned by the prediction service.
    #[serde(default, deserialize_with = "lenient_label")]
    pub prediction: Option<String>,
}

/// A patient and every record saved for them.
///
/// Unique per (first name, last name, owner). Demographics are written when
/// the patient is first created and are not updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// A fresh id is minted when the document has none.
    #[serde(default, deserialize_with = "lenient_patient_id")]
    pub id: PatientId,

    #[serde(rename = "firstname", default, deserialize_with = "lenient_text")]
    pub first_name: String,

    #[serde(rename = "lastname", default, deserialize_with = "lenient_text")]
    pub last_name: String,

    /// Age in whole years.
    #[serde(default)]
    pub age: Reading,

    /// `"Male"` / `"Female"`; anything else is kept but never counted.
    #[serde(default, deserialize_with = "lenient_label")]
    pub sex: Option<String>,

    #[serde(rename = "userid", default, deserialize_with = "lenient_owner")]
    pub owner: UserId,

    #[serde(rename = "createdAt", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// `null` or a non-array decodes as no records; an entry that is not a
    /// record document is skipped.
    #[serde(default, deserialize_with = "lenient_records")]
    pub records: Vec<ClinicalRecord>,
}

impl Patient {
    /// True if this patient matches the natural key used for insert-vs-append.
    pub fn has_natural_key(&self, owner: &UserId, first_name: &str, last_name: &str) -> bool {
        self.owner == *owner && self.first_name == first_name && self.last_name == last_name
    }

    /// Field-by-field equality, ignoring `id`.
    pub fn same_contents(&self, other: &Patient) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.age == other.age
            && self.sex == other.sex
            && self.owner == other.owner
            && self.created_at == other.created_at
            && self.records == other.records
    }
}

fn lenient_patient_id<'de, D>(deserializer: D) -> Result<PatientId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => PatientId(s),
        Value::Number(n) => PatientId(n.to_string()),
        _ => PatientId::new(),
    })
}

fn lenient_owner<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(UserId)
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<ClinicalRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A point-in-time read of every patient visible to one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cohort {
    pub patients: Vec<Patient>,
}

impl Cohort {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    pub fn record_count(&self) -> usize {
        self.patients.iter().map(|p| p.records.len()).sum()
    }

    /// Every (patient, record) pair, patients in order, records in save order.
    pub fn records(&self) -> impl Iterator<Item = (&Patient, &ClinicalRecord)> {
        self.patients
            .iter()
            .flat_map(|p| p.records.iter().map(move |r| (p, r)))
    }

    /// True if both cohorts hold the same patients in the same order,
    /// ignoring patient ids.
    pub fn same_contents(&self, other: &Cohort) -> bool {
        self.patients.len() == other.patients.len()
            && self
                .patients
                .iter()
                .zip(&other.patients)
                .all(|(a, b)| a.same_contents(b))
    }
}
