//! TOML-driven range validator.
//!
//! `TomlRangeValidator` loads a `ValidationConfig` from a TOML string or file
//! and implements the `InputValidator` trait from ihd-core. Every rule is
//! checked; the result lists all violations, in configuration order.

use std::path::Path;

use tracing::{debug, warn};

use ihd_contracts::{
    error::{IhdError, IhdResult},
    prediction::{FieldViolation, VitalReadings},
};
use ihd_core::traits::InputValidator;

use crate::rule::ValidationConfig;

/// The ranges shipped with the workspace.
pub const DEFAULT_RANGES: &str = include_str!("../policies/intake.toml");

/// An `InputValidator` that reads its ranges from a TOML document.
///
/// ```rust,ignore
/// use ihd_policy::TomlRangeValidator;
///
/// let validator = TomlRangeValidator::from_file(Path::new("policies/intake.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlRangeValidator {
    config: ValidationConfig,
}

impl TomlRangeValidator {
    /// Parse `s` as TOML and build a validator.
    ///
    /// Returns `IhdError::ConfigError` if the TOML is malformed, does not
    /// match `ValidationConfig`, or does not cover each vital exactly once
    /// with `min <= max`.
    pub fn from_toml_str(s: &str) -> IhdResult<Self> {
        let config: ValidationConfig = toml::from_str(s).map_err(|e| IhdError::ConfigError {
            reason: format!("failed to parse validation TOML: {}", e),
        })?;

        let problems = config.problems();
        if !problems.is_empty() {
            return Err(IhdError::ConfigError { reason: problems.join("; ") });
        }

        debug!(ranges = config.ranges.len(), "loaded validation ranges");
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as validation configuration.
    pub fn from_file(path: &Path) -> IhdResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| IhdError::ConfigError {
            reason: format!("failed to read validation file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded default ranges.
    pub fn builtin() -> IhdResult<Self> {
        Self::from_toml_str(DEFAULT_RANGES)
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl InputValidator for TomlRangeValidator {
    fn validate(&self, vitals: &VitalReadings) -> Vec<FieldViolation> {
        let violations: Vec<FieldViolation> = self
            .config
            .ranges
            .iter()
            .filter_map(|rule| rule.check(vitals.get(rule.field)))
            .collect();

        if !violations.is_empty() {
            warn!(count = violations.len(), "intake vitals out of range");
        }
        violations
    }
}
