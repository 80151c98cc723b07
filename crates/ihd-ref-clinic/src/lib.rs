//! # ihd-ref-clinic
//!
//! Clinic reference runtime for the IHD risk workspace.
//!
//! Wires the real components (range validator, response verifier, patient
//! store, intake pipeline, cohort aggregator) to fictional data:
//!
//! 1. **Intake walkthrough**: rejected vitals, a refused anonymous save, and
//!    a patient created on first save then reused on the second.
//! 2. **Cohort dashboard**: every analytics view over a seed cohort that
//!    includes deliberately dirty records.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod mock_data;
pub mod runtime;
pub mod scenarios;
