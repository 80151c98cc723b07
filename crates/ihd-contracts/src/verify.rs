//! Response verification schema and report types.
//!
//! A prediction response is never trusted as-is. Before it is decoded and
//! saved it is checked against a `ResponseSchema`, and only a passing
//! `VerificationReport` lets the intake continue.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a response body is checked against.
///
/// Combines a JSON Schema document for structure with domain rules that
/// JSON Schema cannot express conveniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Unique identifier for this schema (e.g. "prediction-response-v1").
    pub schema_id: String,
    /// JSON Schema document for structural validation. `null` disables it.
    pub json_schema: Value,
    /// Domain rules evaluated after structural validation.
    pub rules: Vec<VerificationRule>,
}

/// A single rule applied to a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Referenced in failure reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: VerificationRuleType,
}

/// The kinds of checks the verifier supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// The field at `field_path` must be present and non-null.
    RequiredField {
        /// Dotted path, e.g. "result.percentage".
        field_path: String,
    },

    /// The field at `field_path` must equal one of `allowed`.
    AllowedValues {
        field_path: String,
        allowed: Vec<Value>,
    },

    /// The field at `field_path` must be a number in `[min, max]`.
    NumericRange {
        field_path: String,
        min: f64,
        max: f64,
    },

    /// Delegate to a function registered with the verifier under this name.
    Custom { function_name: String },
}

/// The outcome of checking one body against one schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every rule passed.
    pub passed: bool,
    /// Every failure found. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// One-line summary of all failures, `[rule] message; ...`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}
