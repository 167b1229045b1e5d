//! SQLite-backed patient-data collaborator.

use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use super::{Database, DbError, DbResult};
use crate::gateway::{PatientService, ServiceError, ServiceResult};
use crate::models::{Patient, PatientDraft};

/// Stands in for the remote patient table during development and tests.
pub struct LocalPatientStore {
    db: Mutex<Database>,
}

impl LocalPatientStore {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// All stored patients in insertion order.
    pub fn list_patients(&self) -> ServiceResult<Vec<Patient>> {
        let db = self.lock()?;
        Ok(db.list_patients()?)
    }

    fn lock(&self) -> ServiceResult<std::sync::MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| ServiceError::Backend(format!("Lock poisoned: {}", e)))
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        if e.is_constraint() {
            ServiceError::Validation(e.to_string())
        } else {
            ServiceError::Backend(e.to_string())
        }
    }
}

impl PatientService for LocalPatientStore {
    fn create_patient(&self, draft: &PatientDraft) -> ServiceResult<Patient> {
        let db = self.lock()?;
        let patient = db.insert_patient(draft)?;
        debug!(patient_id = %patient.id, "stored patient");
        Ok(patient)
    }
}
