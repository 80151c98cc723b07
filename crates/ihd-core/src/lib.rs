//! # ihd-core
//!
//! Risk classification and the intake pipeline.
//!
//! This crate provides:
//! - `classify`, the single mapping from a risk percentage to a `RiskTier`
//! - BMI derivation and two-decimal rounding
//! - The four collaborator traits (`InputValidator`, `PredictionService`,
//!   `ResponseVerifier`, `PatientStore`)
//! - `Intake`, which wires them together in validation-first order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ihd_core::{classify, Intake, IntakeForm};
//! ```

pub mod classifier;
pub mod form;
pub mod intake;
pub mod measure;
pub mod traits;

pub use classifier::classify;
pub use form::IntakeForm;
pub use intake::{Intake, PredictionOutcome, SavedRecord};
pub use measure::{derive_bmi, round2};
