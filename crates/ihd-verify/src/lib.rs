//! # ihd-verify
//!
//! Verification of prediction service responses.
//!
//! This crate provides [`engine::ResponseSchemaVerifier`], which implements
//! the [`ihd_core::traits::ResponseVerifier`] trait. It validates response
//! bodies in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: domain rules (`RequiredField`, `AllowedValues`,
//!    `NumericRange`, `Custom`) evaluated against the body.
//!
//! [`prediction::prediction_response_schema`] is the schema the intake
//! pipeline uses, and [`prediction::prediction_verifier`] comes with its
//! custom rules registered.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ihd_verify::{prediction_response_schema, prediction_verifier};
//!
//! let report = prediction_verifier().verify(&body, &prediction_response_schema())?;
//! ```

pub mod engine;
pub mod prediction;

pub use engine::{CustomVerifierFn, ResponseSchemaVerifier};
pub use prediction::{prediction_response_schema, prediction_verifier};

// ── Tests ─────────────────────────────────────────────────────────────────────
