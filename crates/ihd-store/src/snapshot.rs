//! Cohort snapshots as JSON files.
//!
//! The file holds an array of patient documents in the document-store shape
//! (`firstname`, `userid`, `records`, ...). Every patient field decodes
//! leniently: dirty numbers, non-UUID ids, non-string names and `null`
//! record lists all load. Only a file that is not a JSON array of objects
//! is rejected.

use std::path::Path;

use tracing::info;

use ihd_contracts::{
    error::{IhdError, IhdResult},
    patient::Cohort,
};

pub fn load_snapshot(path: &Path) -> IhdResult<Cohort> {
    let contents = std::fs::read_to_string(path).map_err(|e| IhdError::SnapshotError {
        reason: format!("failed to read snapshot '{}': {}", path.display(), e),
    })?;
    let cohort = parse_snapshot(&contents)?;
    info!(
        path = %path.display(),
        patients = cohort.patient_count(),
        records = cohort.record_count(),
        "snapshot loaded"
    );
    Ok(cohort)
}

pub fn parse_snapshot(json: &str) -> IhdResult<Cohort> {
    serde_json::from_str(json).map_err(|e| IhdError::SnapshotError {
        reason: format!("snapshot is not a patient array: {}", e),
    })
}

/// Write `cohort` as pretty-printed JSON.
pub fn write_snapshot(path: &Path, cohort: &Cohort) -> IhdResult<()> {
    let json = serde_json::to_string_pretty(cohort).map_err(|e| IhdError::SnapshotError {
        reason: format!("failed to serialize snapshot: {}", e),
    })?;
    std::fs::write(path, json).map_err(|e| IhdError::SnapshotError {
        reason: format!("failed to write snapshot '{}': {}", path.display(), e),
    })?;
    info!(path = %path.display(), patients = cohort.patient_count(), "snapshot written");
    Ok(())
}
