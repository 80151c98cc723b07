//! In-memory implementation of `PatientStore`.
//!
//! `InMemoryPatientStore` keeps every patient in a `Vec` behind a `Mutex`, so
//! it can be shared across threads (through `Arc`) while the intake appends
//! records and a dashboard reads cohorts.
//!
//! There is no update or delete: patients are inserted once, together with
//! their first record, and only ever gain records.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::{ClinicalRecord, Cohort, Patient, PatientId, UserId},
};
use ihd_core::traits::PatientStore;

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct StoreState {
    /// Patients in insertion order.
    pub(crate) patients: Vec<Patient>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only patient store.
#[derive(Clone)]
pub struct InMemoryPatientStore {
    pub(crate) state: Arc<Mutex<StoreState>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::from_cohort(Cohort::default())
    }

    /// Seed the store with an existing cohort, e.g. a loaded snapshot.
    pub fn from_cohort(cohort: Cohort) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState { patients: cohort.patients })),
        }
    }

    /// Every patient in the store, regardless of owner.
    pub fn export(&self) -> IhdResult<Cohort> {
        Ok(Cohort::new(self.lock()?.patients.clone()))
    }

    fn lock(&self) -> IhdResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|e| IhdError::StoreError {
            reason: format!("patient store lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryPatientStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── PatientStore impl ─────────────────────────────────────────────────────────

impl PatientStore for InMemoryPatientStore {
    /// Append under the patient with the same natural key, or insert
    /// `patient` holding just `record`. The whole step runs under one lock.
    /// Inserting a patient whose id is already in use fails and changes
    /// nothing.
    fn append_or_create(
        &self,
        patient: Patient,
        record: ClinicalRecord,
    ) -> IhdResult<(PatientId, bool)> {
        let mut state = self.lock()?;

        if let Some(existing) = state
            .patients
            .iter_mut()
            .find(|p| p.has_natural_key(&patient.owner, &patient.first_name, &patient.last_name))
        {
            existing.records.push(record);
            debug!(
                patient_id = %existing.id,
                records = existing.records.len(),
                "record appended"
            );
            return Ok((existing.id.clone(), false));
        }

        if state.patients.iter().any(|p| p.id == patient.id) {
            return Err(IhdError::StoreError {
                reason: format!("patient id {} already exists", patient.id),
            });
        }

        let id = patient.id.clone();
        info!(patient_id = %id, owner = %patient.owner, "patient inserted");
        state.patients.push(Patient { records: vec![record], ..patient });
        Ok((id, true))
    }

    fn load_cohort(&self, owner: &UserId) -> IhdResult<Cohort> {
        let state = self.lock()?;
        let patients: Vec<Patient> =
            state.patients.iter().filter(|p| &p.owner == owner).cloned().collect();
        debug!(owner = %owner, patients = patients.len(), "cohort loaded");
        Ok(Cohort::new(patients))
    }
}
