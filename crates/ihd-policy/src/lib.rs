//! # ihd-policy
//!
//! TOML-driven range validation for intake vitals.
//!
//! ## Overview
//!
//! This crate provides [`TomlRangeValidator`], which implements the
//! [`InputValidator`](ihd_core::traits::InputValidator) trait. Ranges are
//! declared in a TOML file, one per vital. The default ranges ship embedded
//! in the binary and can be replaced from a file.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ihd_policy::TomlRangeValidator;
//!
//! let validator = TomlRangeValidator::builtin()?;
//! // Pass `validator` to `ihd_core::Intake::new(...)`.
//! ```

pub mod engine;
pub mod rule;

pub use engine::{TomlRangeValidator, DEFAULT_RANGES};
pub use rule::{RangeRule, ValidationConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
