//! # ihd-store
//!
//! Append-only patient persistence for the IHD risk workspace.
//!
//! ## Overview
//!
//! [`InMemoryPatientStore`] implements the
//! [`PatientStore`](ihd_core::traits::PatientStore) trait. Patients are
//! keyed by (owner, first name, last name) and only ever gain records;
//! `append_or_create` finds, inserts and appends under a single lock.
//! [`snapshot`] reads and writes whole cohorts as JSON.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ihd_store::{InMemoryPatientStore, load_snapshot};
//!
//! let store = InMemoryPatientStore::from_cohort(load_snapshot(path)?);
//! let (id, created) = store.append_or_create(patient, record)?;
//! let cohort = store.load_cohort(&user)?;
//! ```

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryPatientStore;
pub use snapshot::{load_snapshot, parse_snapshot, write_snapshot};

// ── Tests ─────────────────────────────────────────────────────────────────────
