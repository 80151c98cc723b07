//! Range rule types and configuration schema.
//!
//! A `ValidationConfig` is deserialized from TOML and holds one `RangeRule`
//! per vital. Bounds are inclusive.

use serde::{Deserialize, Serialize};

use ihd_contracts::{
    prediction::{FieldViolation, VitalField},
    reading::Reading,
};

/// The accepted range for one vital.
///
/// Example in TOML:
/// ```toml
/// [[ranges]]
/// field = "age"
/// min = 18
/// max = 98
/// unit = "years"
/// message = "Age must be between 18 and 98 years."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub field: VitalField,

    pub min: f64,

    pub max: f64,

    /// Display unit, informational only.
    #[serde(default)]
    pub unit: Option<String>,

    /// Shown to the user when the value is missing, unparsable or out of range.
    pub message: String,
}

impl RangeRule {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// A violation if `reading` is not a number inside the range.
    pub fn check(&self, reading: &Reading) -> Option<FieldViolation> {
        match reading.value() {
            Some(v) if self.contains(v) => None,
            _ => Some(FieldViolation {
                field: self.field,
                value: reading.clone(),
                message: self.message.clone(),
            }),
        }
    }
}

/// The top-level structure deserialized from a TOML validation file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// One rule per vital, checked in this order.
    pub ranges: Vec<RangeRule>,
}

impl ValidationConfig {
    /// Problems that make the config unusable: a vital with no rule, a vital
    /// with two rules, or an inverted range.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for field in VitalField::ALL {
            match self.ranges.iter().filter(|r| r.field == field).count() {
                0 => problems.push(format!("no range configured for '{}'", field.name())),
                1 => {}
                n => problems.push(format!("{} ranges configured for '{}'", n, field.name())),
            }
        }

        for rule in &self.ranges {
            if rule.min.is_nan() || rule.max.is_nan() || rule.min > rule.max {
                problems.push(format!(
                    "range for '{}' has min {} above max {}",
                    rule.field.name(),
                    rule.min,
                    rule.max
                ));
            }
        }

        problems
    }
}
