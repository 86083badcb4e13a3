//! Doctor use-cases under the flat trust model.
//!
//! Reads are public. Writes require an authenticated requester but impose no
//! ownership check: any authenticated user may mutate any doctor record. The
//! HTTP adapter enforces the authentication requirement; this service only
//! needs the repository.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::doctor::{Doctor, DoctorChanges, DoctorDraft};
use super::ports::{DoctorRepository, PersistenceError};
use super::Error;

fn doctor_not_found() -> Error {
    Error::not_found("doctor not found")
}

fn duplicate_email() -> Error {
    Error::conflict("a doctor with this email already exists")
}

/// Doctor CRUD without ownership.
#[derive(Clone)]
pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    /// Create a new service over its repository port.
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    /// Create a doctor record.
    pub async fn create(&self, draft: DoctorDraft) -> Result<Doctor, Error> {
        let doctor = self.doctors.insert(draft).await.map_err(|err| match err {
            PersistenceError::Duplicate { .. } => duplicate_email(),
            other => other.into(),
        })?;
        info!(doctor_id = %doctor.id, "doctor created");
        Ok(doctor)
    }

    /// List all doctors; public.
    pub async fn list(&self) -> Result<Vec<Doctor>, Error> {
        Ok(self.doctors.list().await?)
    }

    /// Fetch one doctor by id; public.
    pub async fn get(&self, id: Uuid) -> Result<Doctor, Error> {
        self.doctors.find(id).await?.ok_or_else(doctor_not_found)
    }

    /// Apply a partial update to a doctor.
    pub async fn update(&self, id: Uuid, changes: DoctorChanges) -> Result<Doctor, Error> {
        self.doctors
            .update(id, changes)
            .await
            .map_err(|err| match err {
                PersistenceError::Duplicate { .. } => duplicate_email(),
                other => other.into(),
            })?
            .ok_or_else(doctor_not_found)
    }

    /// Delete a doctor record.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if self.doctors.delete(id).await? {
            info!(doctor_id = %id, "doctor deleted");
            Ok(())
        } else {
            Err(doctor_not_found())
        }
    }
}
