//! Schema-based verifier for prediction responses.
//!
//! `ResponseSchemaVerifier` implements the `ResponseVerifier` trait from
//! `ihd-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the body is validated against
//!    `ResponseSchema::json_schema` using the `jsonschema` crate.
//! 2. **Semantic**: each `VerificationRule` in `ResponseSchema::rules` is
//!    evaluated in order. All failures are collected before returning.
//!
//! Custom rules delegate to named functions registered via `register_rule`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use ihd_contracts::{
    error::IhdResult,
    verify::{ResponseSchema, VerificationFailure, VerificationReport, VerificationRuleType},
};
use ihd_core::traits::ResponseVerifier;

/// A caller-supplied verification function.
///
/// Receives the full response body. Returns `Some(message)` when the check
/// fails, or `None` on success.
pub type CustomVerifierFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Verifies prediction response bodies before they are decoded.
pub struct ResponseSchemaVerifier {
    custom_rules: HashMap<String, CustomVerifierFn>,
}

impl ResponseSchemaVerifier {
    /// Create a verifier with no custom rules registered.
    pub fn new() -> Self {
        Self { custom_rules: HashMap::new() }
    }

    /// Register a custom verification function under `name`.
    ///
    /// The name must match the `function_name` used in
    /// `VerificationRuleType::Custom` rules. Registering the same name twice
    /// replaces the previous function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomVerifierFn) {
        self.custom_rules.insert(name.into(), f);
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Resolve a dotted path against `value`. `None` if any segment is
    /// missing or null.
    fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
        let mut current = value;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(v) if !v.is_null() => current = v,
                _ => return None,
            }
        }
        Some(current)
    }

    fn structural_failures(body: &Value, schema: &ResponseSchema) -> Vec<VerificationFailure> {
        // A null json_schema means no structural constraint.
        if schema.json_schema.is_null() {
            return Vec::new();
        }

        let messages: Vec<String> = match jsonschema::validator_for(&schema.json_schema) {
            Ok(validator) => validator
                .iter_errors(body)
                .map(|error| format!("JSON Schema violation at {}: {}", error.instance_path, error))
                .collect(),
            Err(e) => vec![format!("invalid JSON Schema document: {e}")],
        };

        messages
            .into_iter()
            .map(|message| {
                warn!(schema_id = %schema.schema_id, %message, "structural validation failure");
                VerificationFailure { rule_id: "json-schema".to_string(), message }
            })
            .collect()
    }

    fn check_rule(&self, body: &Value, rule_type: &VerificationRuleType) -> Option<String> {
        match rule_type {
            VerificationRuleType::RequiredField { field_path } => Self::resolve_path(body, field_path)
                .is_none()
                .then(|| format!("required field '{field_path}' is missing or null")),

            VerificationRuleType::AllowedValues { field_path, allowed } => {
                match Self::resolve_path(body, field_path) {
                    None => Some(format!(
                        "field '{field_path}' is missing; cannot check allowed values"
                    )),
                    Some(actual) if allowed.contains(actual) => None,
                    Some(actual) => Some(format!(
                        "field '{field_path}' has value {actual} which is not in the allowed set"
                    )),
                }
            }

            VerificationRuleType::NumericRange { field_path, min, max } => {
                match Self::resolve_path(body, field_path).map(Value::as_f64) {
                    None => Some(format!("field '{field_path}' is missing; cannot check range")),
                    Some(None) => Some(format!("field '{field_path}' is not a number")),
                    Some(Some(v)) if (*min..=*max).contains(&v) => None,
                    Some(Some(v)) => Some(format!(
                        "field '{field_path}' is {v}, outside [{min}, {max}]"
                    )),
                }
            }

            // An unregistered name is itself a failure.
            VerificationRuleType::Custom { function_name } => {
                match self.custom_rules.get(function_name.as_str()) {
                    Some(f) => f(body),
                    None => Some(format!(
                        "no custom rule registered for function name '{function_name}'"
                    )),
                }
            }
        }
    }
}

impl Default for ResponseSchemaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseVerifier for ResponseSchemaVerifier {
    fn verify(&self, body: &Value, schema: &ResponseSchema) -> IhdResult<VerificationReport> {
        let mut failures = Self::structural_failures(body, schema);

        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "evaluating verification rule");

            if let Some(message) = self.check_rule(body, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "semantic rule failed");
                failures.push(VerificationFailure { rule_id: rule.rule_id.clone(), message });
            }
        }

        let passed = failures.is_empty();
        debug!(
            schema_id = %schema.schema_id,
            passed,
            failure_count = failures.len(),
            "verification complete"
        );

        Ok(VerificationReport { passed, failures })
    }
}
