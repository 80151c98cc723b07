//! The schema every prediction response is checked against.

use serde_json::{json, Value};

use ihd_contracts::{
    risk::RiskTier,
    verify::{ResponseSchema, VerificationRule, VerificationRuleType},
};

use crate::engine::ResponseSchemaVerifier;

pub const PREDICTION_SCHEMA_ID: &str = "prediction-response-v1";

/// Name under which [`susceptibility_matches_percentage`] is registered.
pub const SUSCEPTIBILITY_RULE: &str = "susceptibility-matches-percentage";

fn rule(id: &str, description: &str, rule_type: VerificationRuleType) -> VerificationRule {
    VerificationRule {
        rule_id: id.to_string(),
        description: description.to_string(),
        rule_type,
    }
}

/// `{prediction: string, percentage: number in [0, 100], risk_level: tier label}`.
pub fn prediction_response_schema() -> ResponseSchema {
    let tier_labels: Vec<Value> = RiskTier::ALL
        .iter()
        .flat_map(|t| [json!(t.display_label()), json!(t.label())])
        .collect();

    ResponseSchema {
        schema_id: PREDICTION_SCHEMA_ID.to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "prediction": { "type": "string" },
                "percentage": { "type": "number" },
                "risk_level": { "type": "string" }
            },
            "required": ["prediction", "percentage", "risk_level"]
        }),
        rules: vec![
            rule(
                "percentage-range",
                "risk percentage must lie in [0, 100]",
                VerificationRuleType::NumericRange {
                    field_path: "percentage".to_string(),
                    min: 0.0,
                    max: 100.0,
                },
            ),
            rule(
                "known-risk-level",
                "risk level must name one of the four tiers",
                VerificationRuleType::AllowedValues {
                    field_path: "risk_level".to_string(),
                    allowed: tier_labels,
                },
            ),
            rule(
                "known-prediction",
                "prediction must be a susceptibility label",
                VerificationRuleType::AllowedValues {
                    field_path: "prediction".to_string(),
                    allowed: vec![json!("susceptible"), json!("not susceptible")],
                },
            ),
            rule(
                "susceptibility-consistent",
                "'not susceptible' exactly when the percentage is zero",
                VerificationRuleType::Custom { function_name: SUSCEPTIBILITY_RULE.to_string() },
            ),
        ],
    }
}

/// "not susceptible" is reserved for a percentage of exactly zero.
pub fn susceptibility_matches_percentage(body: &Value) -> Option<String> {
    let percentage = body.get("percentage").and_then(Value::as_f64)?;
    let prediction = body.get("prediction").and_then(Value::as_str)?;

    let expected = if percentage == 0.0 { "not susceptible" } else { "susceptible" };
    (prediction != expected).then(|| {
        format!("prediction '{prediction}' does not match percentage {percentage} (expected '{expected}')")
    })
}

/// A verifier with every custom rule `prediction_response_schema` uses.
pub fn prediction_verifier() -> ResponseSchemaVerifier {
    let mut verifier = ResponseSchemaVerifier::new();
    verifier.register_rule(SUSCEPTIBILITY_RULE, Box::new(susceptibility_matches_percentage));
    verifier
}
