//! Clinic reference scenarios.
//!
//! Each scenario wires the real components to fictional data and prints what
//! happens at each step.

pub mod cohort_dashboard;
pub mod intake_walkthrough;
