//! Error types for the intake, storage, and configuration paths.
//!
//! The risk classifier and the cohort aggregator never fail; everything that
//! can is reported through `IhdError`.

use thiserror::Error;

use crate::prediction::FieldViolation;

/// The unified error type for the workspace.
#[derive(Debug, Error)]
pub enum IhdError {
    /// One or more vitals are outside their accepted range. Nothing was sent.
    #[error("input validation failed: {}", join_messages(.violations))]
    Validation { violations: Vec<FieldViolation> },

    /// Required form fields are empty, so the record cannot be saved.
    #[error("incomplete details: missing {}", .missing.join(", "))]
    IncompleteForm { missing: Vec<String> },

    /// A save was attempted without an authenticated user.
    #[error("user is not authenticated")]
    Unauthenticated,

    /// The prediction service could not be reached or did not answer.
    #[error("prediction request failed: {reason}")]
    PredictionFailed { reason: String },

    /// The prediction service answered with an error payload.
    #[error("prediction service error: {message}")]
    BackendError { message: String },

    /// The prediction response did not pass verification.
    #[error("prediction response rejected: {reason}")]
    ResponseRejected { reason: String },

    /// The patient store could not read or append.
    #[error("store operation failed: {reason}")]
    StoreError { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A cohort snapshot could not be read or written.
    #[error("snapshot error: {reason}")]
    SnapshotError { reason: String },
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convenience alias used throughout the workspace.
pub type IhdResult<T> = Result<T, IhdError>;
