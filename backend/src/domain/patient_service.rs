//! Patient use-cases, scoped to the owning user.
//!
//! Every operation takes the requester's user id and refuses to observe rows
//! owned by anyone else. Ownership mismatches surface as `not_found`, never
//! `forbidden`, so foreign patient ids cannot be probed for existence.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::patient::{Patient, PatientChanges, PatientDraft};
use super::ports::PatientRepository;
use super::Error;

fn patient_not_found() -> Error {
    Error::not_found("patient not found")
}

/// Patient CRUD with ownership scoping.
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    /// Create a new service over its repository port.
    pub fn new(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    /// Create a patient owned by the requester.
    ///
    /// The owner is forced to `requester` here; any owner value a client may
    /// have smuggled into the payload never reaches this point.
    pub async fn create(&self, requester: Uuid, draft: PatientDraft) -> Result<Patient, Error> {
        let patient = self.patients.insert(requester, draft).await?;
        info!(patient_id = %patient.id, owner = %requester, "patient created");
        Ok(patient)
    }

    /// List exactly the requester's patients.
    pub async fn list(&self, requester: Uuid) -> Result<Vec<Patient>, Error> {
        Ok(self.patients.list_owned(requester).await?)
    }

    /// Fetch one owned patient; absent and foreign ids are the same failure.
    pub async fn get(&self, requester: Uuid, id: Uuid) -> Result<Patient, Error> {
        self.patients
            .find_owned(id, requester)
            .await?
            .ok_or_else(patient_not_found)
    }

    /// Apply a partial update to one owned patient.
    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        changes: PatientChanges,
    ) -> Result<Patient, Error> {
        self.patients
            .update_owned(id, requester, changes)
            .await?
            .ok_or_else(patient_not_found)
    }

    /// Delete one owned patient; its mappings go with it.
    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), Error> {
        if self.patients.delete_owned(id, requester).await? {
            info!(patient_id = %id, owner = %requester, "patient deleted");
            Ok(())
        } else {
            Err(patient_not_found())
        }
    }
}
