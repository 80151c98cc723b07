//! The intake form as typed by the user.
//!
//! Every field is kept as raw text until it is needed, so unparsable input
//! surfaces as a validation message instead of a decode error.

use serde::{Deserialize, Serialize};

use ihd_contracts::{
    patient::StrokeHistory,
    prediction::VitalReadings,
    reading::Reading,
};

use crate::measure::derive_bmi;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub sex: String,
    pub systolic: String,
    pub diastolic: String,
    pub cholesterol: String,
    pub weight: String,
    pub height: String,
    pub history_of_stroke: String,
}

impl IntakeForm {
    /// BMI derived from the current weight and height, if both are positive.
    pub fn bmi(&self) -> Option<f64> {
        let weight = Reading::parse(&self.weight).value()?;
        let height = Reading::parse(&self.height).value()?;
        derive_bmi(weight, height)
    }

    /// The five range-checked vitals.
    pub fn vitals(&self) -> VitalReadings {
        VitalReadings {
            age: Reading::parse(&self.age),
            systolic: Reading::parse(&self.systolic),
            diastolic: Reading::parse(&self.diastolic),
            cholesterol: Reading::parse(&self.cholesterol),
            bmi: self.bmi().map(Reading::Valid).unwrap_or_default(),
        }
    }

    /// `1` only for an explicit "Yes".
    pub fn stroke_flag(&self) -> u8 {
        StrokeHistory::from_label(&self.history_of_stroke)
            .map(|s| s.as_flag())
            .unwrap_or(0)
    }

    /// Names of required fields that are still empty.
    ///
    /// BMI counts as missing when it cannot be derived.
    pub fn missing_fields(&self) -> Vec<String> {
        let text_fields = [
            ("lastname", &self.last_name),
            ("firstname", &self.first_name),
            ("age", &self.age),
            ("sex", &self.sex),
            ("blood_pressure_systolic", &self.systolic),
            ("blood_pressure_diastolic", &self.diastolic),
            ("cholesterol_level", &self.cholesterol),
            ("weight", &self.weight),
            ("height", &self.height),
        ];

        let mut missing: Vec<String> = text_fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect();

        if self.bmi().is_none() {
            missing.push("BMI".to_string());
        }
        if self.history_of_stroke.trim().is_empty() {
            missing.push("history_of_stroke".to_string());
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> IntakeForm {
        IntakeForm {
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            age: "54".to_string(),
            sex: "Female".to_string(),
            systolic: "138".to_string(),
            diastolic: "86".to_string(),
            cholesterol: "5.4".to_string(),
            weight: "72".to_string(),
            height: "165".to_string(),
            history_of_stroke: "No".to_string(),
        }
    }

    #[test]
    fn complete_form_has_no_missing_fields() {
        assert!(complete().missing_fields().is_empty());
    }

    #[test]
    fn bmi_is_re_derived_after_height_changes() {
        let mut form = complete();
        let before = form.bmi().unwrap();
        form.height = "180".to_string();
        let after = form.bmi().unwrap();
        assert!(after < before);
        assert_eq!(form.vitals().bmi, Reading::Valid(after));
    }

    #[test]
    fn missing_height_makes_bmi_missing() {
        let mut form = complete();
        form.height.clear();
        let missing = form.missing_fields();
        assert!(missing.contains(&"height".to_string()));
        assert!(missing.contains(&"BMI".to_string()));
        assert!(form.vitals().bmi.is_missing());
    }

    #[test]
    fn stroke_flag_only_for_yes() {
        let mut form = complete();
        assert_eq!(form.stroke_flag(), 0);
        form.history_of_stroke = "Yes".to_string();
        assert_eq!(form.stroke_flag(), 1);
        form.history_of_stroke = "unknown".to_string();
        assert_eq!(form.stroke_flag(), 0);
    }
}
