//! Scatter-plot data: per-record feature points and the axis selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ihd_contracts::patient::{ClinicalRecord, Cohort, Patient, StrokeHistory};

/// A plottable numeric feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScatterFeature {
    Age,
    #[serde(rename = "BMI")]
    Bmi,
    #[serde(rename = "Blood_Pressure_Systolic")]
    Systolic,
    #[serde(rename = "Blood_Pressure_Diastolic")]
    Diastolic,
    #[serde(rename = "Cholesterol_Level")]
    Cholesterol,
    #[serde(rename = "History_of_Stroke")]
    Stroke,
}

impl ScatterFeature {
    pub const ALL: [ScatterFeature; 6] = [
        ScatterFeature::Age,
        ScatterFeature::Bmi,
        ScatterFeature::Systolic,
        ScatterFeature::Diastolic,
        ScatterFeature::Cholesterol,
        ScatterFeature::Stroke,
    ];

    /// Stable key, as used in serialized points.
    pub fn key(&self) -> &'static str {
        match self {
            ScatterFeature::Age => "Age",
            ScatterFeature::Bmi => "BMI",
            ScatterFeature::Systolic => "Blood_Pressure_Systolic",
            ScatterFeature::Diastolic => "Blood_Pressure_Diastolic",
            ScatterFeature::Cholesterol => "Cholesterol_Level",
            ScatterFeature::Stroke => "History_of_Stroke",
        }
    }

    /// Axis label.
    pub fn label(&self) -> &'static str {
        match self {
            ScatterFeature::Age => "Age (yrs)",
            ScatterFeature::Bmi => "BMI",
            ScatterFeature::Systolic => "Systolic BP (mmHg)",
            ScatterFeature::Diastolic => "Diastolic BP (mmHg)",
            ScatterFeature::Cholesterol => "Cholesterol Level (mmol/L)",
            ScatterFeature::Stroke => "History of Stroke",
        }
    }
}

impl fmt::Display for ScatterFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScatterFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScatterFeature::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let keys: Vec<&str> = ScatterFeature::ALL.iter().map(|f| f.key()).collect();
                format!("unknown feature '{s}' (expected one of {})", keys.join(", "))
            })
    }
}

/// The two selected axes. They are never equal: selecting a feature for
/// one axis that the other already holds clears the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScatterAxes {
    x: Option<ScatterFeature>,
    y: Option<ScatterFeature>,
}

impl Default for ScatterAxes {
    fn default() -> Self {
        Self { x: Some(ScatterFeature::Age), y: Some(ScatterFeature::Cholesterol) }
    }
}

impl ScatterAxes {
    /// Build a selection, applying the same rule as selecting X then Y.
    pub fn new(x: Option<ScatterFeature>, y: Option<ScatterFeature>) -> Self {
        let mut axes = Self { x, y: None };
        if let Some(y) = y {
            axes.select_y(y);
        }
        axes
    }

    pub fn x(&self) -> Option<ScatterFeature> {
        self.x
    }

    pub fn y(&self) -> Option<ScatterFeature> {
        self.y
    }

    pub fn select_x(&mut self, feature: ScatterFeature) {
        if self.y == Some(feature) {
            self.y = None;
        }
        self.x = Some(feature);
    }

    pub fn select_y(&mut self, feature: ScatterFeature) {
        if self.x == Some(feature) {
            self.x = None;
        }
        self.y = Some(feature);
    }

    /// Features offered for the X axis: everything except the current Y.
    pub fn x_options(&self) -> Vec<ScatterFeature> {
        ScatterFeature::ALL.into_iter().filter(|f| Some(*f) != self.y).collect()
    }

    /// Features offered for the Y axis: everything except the current X.
    pub fn y_options(&self) -> Vec<ScatterFeature> {
        ScatterFeature::ALL.into_iter().filter(|f| Some(*f) != self.x).collect()
    }
}

/// One (patient, record) pair projected onto the scatter features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScatterPoint {
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(rename = "BMI", skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(rename = "Blood_Pressure_Systolic", skip_serializing_if = "Option::is_none")]
    pub systolic: Option<f64>,
    #[serde(rename = "Blood_Pressure_Diastolic", skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<f64>,
    #[serde(rename = "Cholesterol_Level", skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
    #[serde(rename = "History_of_Stroke")]
    pub stroke: f64,
    #[serde(rename = "Risk_Level", skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
}

impl ScatterPoint {
    pub fn project(patient: &Patient, record: &ClinicalRecord) -> Self {
        let is_stroke = record
            .history_of_stroke
            .as_deref()
            .and_then(StrokeHistory::from_label)
            == Some(StrokeHistory::Yes);

        Self {
            age: patient.age.value().map(f64::trunc),
            bmi: record.bmi.value(),
            systolic: record.systolic.value(),
            diastolic: record.diastolic.value(),
            cholesterol: record.cholesterol.value(),
            stroke: if is_stroke { 1.0 } else { 0.0 },
            risk_level: record.risk_level.clone(),
        }
    }

    pub fn get(&self, feature: ScatterFeature) -> Option<f64> {
        match feature {
            ScatterFeature::Age => self.age,
            ScatterFeature::Bmi => self.bmi,
            ScatterFeature::Systolic => self.systolic,
            ScatterFeature::Diastolic => self.diastolic,
            ScatterFeature::Cholesterol => self.cholesterol,
            ScatterFeature::Stroke => Some(self.stroke),
        }
    }

    fn plottable(&self, axes: &ScatterAxes) -> bool {
        let has = |axis: Option<ScatterFeature>| axis.and_then(|f| self.get(f)).is_some();
        has(axes.x()) && has(axes.y())
    }
}

/// Every record that has a value on both selected axes.
///
/// With either axis unselected the cloud is empty.
pub fn scatter_cloud(cohort: &Cohort, axes: &ScatterAxes) -> Vec<ScatterPoint> {
    cohort
        .records()
        .map(|(patient, record)| ScatterPoint::project(patient, record))
        .filter(|point| point.plottable(axes))
        .collect()
}
