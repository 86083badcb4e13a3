//! Mapping use-cases with transitive ownership scoping.
//!
//! The one non-trivial rule in this system, applied to every operation here:
//! ownership is resolved through the mapping's patient, never stored on the
//! mapping itself. A patient ownership change (were it ever allowed) would
//! therefore re-scope all of its mappings automatically.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::doctor::Doctor;
use super::mapping::Mapping;
use super::ports::{
    DoctorRepository, MappingRepository, PatientRepository, PersistenceError,
};
use super::Error;

fn patient_not_found() -> Error {
    Error::not_found("patient not found")
}

fn mapping_conflict() -> Error {
    Error::conflict("this doctor is already assigned to the patient")
}

/// Patient-doctor assignment use-cases.
#[derive(Clone)]
pub struct MappingService {
    mappings: Arc<dyn MappingRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl MappingService {
    /// Create a new service over its repository ports.
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        patients: Arc<dyn PatientRepository>,
        doctors: Arc<dyn DoctorRepository>,
    ) -> Self {
        Self {
            mappings,
            patients,
            doctors,
        }
    }

    /// Assign a doctor to one of the requester's patients.
    ///
    /// The patient must exist and belong to the requester; a foreign patient
    /// fails exactly like an absent one. Doctor existence is validated, but
    /// doctor ownership is irrelevant. Duplicate assignments are rejected
    /// with `conflict` (backed by a unique index for the concurrent case).
    pub async fn create(
        &self,
        requester: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<Mapping, Error> {
        if self
            .patients
            .find_owned(patient_id, requester)
            .await?
            .is_none()
        {
            return Err(patient_not_found());
        }
        if self.doctors.find(doctor_id).await?.is_none() {
            return Err(Error::not_found("doctor not found"));
        }
        if self.mappings.exists(patient_id, doctor_id).await? {
            return Err(mapping_conflict());
        }
        let mapping = self
            .mappings
            .insert(patient_id, doctor_id)
            .await
            .map_err(|err| match err {
                // Lost a race against a concurrent identical insert.
                PersistenceError::Duplicate { .. } => mapping_conflict(),
                other => other.into(),
            })?;
        info!(mapping_id = %mapping.id, patient_id = %patient_id, doctor_id = %doctor_id,
            "mapping created");
        Ok(mapping)
    }

    /// List every mapping whose patient belongs to the requester.
    pub async fn list(&self, requester: Uuid) -> Result<Vec<Mapping>, Error> {
        Ok(self.mappings.list_for_owner(requester).await?)
    }

    /// List the doctors assigned to one of the requester's patients.
    pub async fn list_doctors_for_patient(
        &self,
        requester: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<Doctor>, Error> {
        if self
            .patients
            .find_owned(patient_id, requester)
            .await?
            .is_none()
        {
            return Err(patient_not_found());
        }
        Ok(self.mappings.doctors_for_patient(patient_id).await?)
    }

    /// Remove a mapping, provided its patient belongs to the requester.
    pub async fn delete(&self, requester: Uuid, mapping_id: Uuid) -> Result<(), Error> {
        if self.mappings.delete_owned(mapping_id, requester).await? {
            info!(mapping_id = %mapping_id, "mapping deleted");
            Ok(())
        } else {
            Err(Error::not_found("mapping not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::doctor::DoctorDraft;
    use crate::domain::patient::{Patient, PatientChanges, PatientDraft};
    use crate::domain::ErrorCode;

    /// Stub mirroring the join-based scoping of the real adapter: the owner
    /// lives only on the patient rows handed in at construction.
    #[derive(Default)]
    struct StubMappingRepository {
        mappings: Mutex<Vec<Mapping>>,
        patients: Mutex<Vec<Patient>>,
        doctors: Mutex<Vec<Doctor>>,
    }

    impl StubMappingRepository {
        fn seed_patient(&self, owner: Uuid) -> Patient {
            let draft =
                PatientDraft::try_new("Seed Patient", 30, "male", None, None).expect("draft");
            let (first_name, last_name) = draft.name.into_parts();
            let now = Utc::now();
            let patient = Patient {
                id: Uuid::new_v4(),
                owner_user_id: owner,
                first_name,
                last_name,
                age: draft.age,
                gender: draft.gender,
                address: draft.address,
                medical_history: draft.medical_history,
                created_at: now,
                updated_at: now,
            };
            self.patients.lock().expect("lock").push(patient.clone());
            patient
        }

        fn seed_doctor(&self, email: &str) -> Doctor {
            let draft =
                DoctorDraft::try_new("D Doc", "GP", email, None, None).expect("draft");
            let (first_name, last_name) = draft.name.into_parts();
            let now = Utc::now();
            let doctor = Doctor {
                id: Uuid::new_v4(),
                first_name,
                last_name,
                specialization: draft.specialization,
                email: draft.email,
                phone_number: draft.phone_number,
                experience_years: draft.experience_years,
                created_at: now,
                updated_at: now,
            };
            self.doctors.lock().expect("lock").push(doctor.clone());
            doctor
        }

        fn patient_owner(&self, patient_id: Uuid) -> Option<Uuid> {
            self.patients
                .lock()
                .expect("lock")
                .iter()
                .find(|p| p.id == patient_id)
                .map(|p| p.owner_user_id)
        }
    }

    #[async_trait]
    impl MappingRepository for StubMappingRepository {
        async fn insert(
            &self,
            patient_id: Uuid,
            doctor_id: Uuid,
        ) -> Result<Mapping, PersistenceError> {
            let mut mappings = self.mappings.lock().expect("lock");
            if mappings
                .iter()
                .any(|m| m.patient_id == patient_id && m.doctor_id == doctor_id)
            {
                return Err(PersistenceError::duplicate("mappings_patient_doctor_key"));
            }
            let mapping = Mapping {
                id: Uuid::new_v4(),
                patient_id,
                doctor_id,
                created_at: Utc::now(),
            };
            mappings.push(mapping.clone());
            Ok(mapping)
        }

        async fn exists(
            &self,
            patient_id: Uuid,
            doctor_id: Uuid,
        ) -> Result<bool, PersistenceError> {
            Ok(self
                .mappings
                .lock()
                .expect("lock")
                .iter()
                .any(|m| m.patient_id == patient_id && m.doctor_id == doctor_id))
        }

        async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Mapping>, PersistenceError> {
            Ok(self
                .mappings
                .lock()
                .expect("lock")
                .iter()
                .filter(|m| self.patient_owner(m.patient_id) == Some(owner))
                .cloned()
                .collect())
        }

        async fn doctors_for_patient(
            &self,
            patient_id: Uuid,
        ) -> Result<Vec<Doctor>, PersistenceError> {
            let doctor_ids: Vec<Uuid> = self
                .mappings
                .lock()
                .expect("lock")
                .iter()
                .filter(|m| m.patient_id == patient_id)
                .map(|m| m.doctor_id)
                .collect();
            Ok(self
                .doctors
                .lock()
                .expect("lock")
                .iter()
                .filter(|d| doctor_ids.contains(&d.id))
                .cloned()
                .collect())
        }

        async fn delete_owned(
            &self,
            mapping_id: Uuid,
            owner: Uuid,
        ) -> Result<bool, PersistenceError> {
            let mut mappings = self.mappings.lock().expect("lock");
            let before = mappings.len();
            let owned: Vec<Uuid> = mappings
                .iter()
                .filter(|m| m.id == mapping_id)
                .filter(|m| self.patient_owner(m.patient_id) == Some(owner))
                .map(|m| m.id)
                .collect();
            mappings.retain(|m| !owned.contains(&m.id));
            Ok(mappings.len() < before)
        }
    }

    #[async_trait]
    impl PatientRepository for StubMappingRepository {
        async fn insert(
            &self,
            _owner: Uuid,
            _draft: PatientDraft,
        ) -> Result<Patient, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn list_owned(&self, _owner: Uuid) -> Result<Vec<Patient>, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn find_owned(
            &self,
            id: Uuid,
            owner: Uuid,
        ) -> Result<Option<Patient>, PersistenceError> {
            Ok(self
                .patients
                .lock()
                .expect("lock")
                .iter()
                .find(|p| p.id == id && p.owner_user_id == owner)
                .cloned())
        }

        async fn update_owned(
            &self,
            _id: Uuid,
            _owner: Uuid,
            _changes: PatientChanges,
        ) -> Result<Option<Patient>, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn delete_owned(&self, _id: Uuid, _owner: Uuid) -> Result<bool, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }
    }

    #[async_trait]
    impl DoctorRepository for StubMappingRepository {
        async fn insert(&self, _draft: DoctorDraft) -> Result<Doctor, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn list(&self) -> Result<Vec<Doctor>, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn find(&self, id: Uuid) -> Result<Option<Doctor>, PersistenceError> {
            Ok(self
                .doctors
                .lock()
                .expect("lock")
                .iter()
                .find(|d| d.id == id)
                .cloned())
        }

        async fn update(
            &self,
            _id: Uuid,
            _changes: crate::domain::doctor::DoctorChanges,
        ) -> Result<Option<Doctor>, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, PersistenceError> {
            unimplemented!("not exercised by mapping tests")
        }
    }

    fn service(store: Arc<StubMappingRepository>) -> MappingService {
        MappingService::new(store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn create_links_owned_patient_to_doctor() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let patient = store.seed_patient(owner);
        let doctor = store.seed_doctor("d@doc.com");

        let mapping = service(store)
            .create(owner, patient.id, doctor.id)
            .await
            .expect("create succeeds");
        assert_eq!(mapping.patient_id, patient.id);
        assert_eq!(mapping.doctor_id, doctor.id);
    }

    #[tokio::test]
    async fn create_for_foreign_patient_is_not_found_even_though_it_exists() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let patient = store.seed_patient(owner);
        let doctor = store.seed_doctor("d@doc.com");

        let err = service(store)
            .create(intruder, patient.id, doctor.id)
            .await
            .expect_err("foreign patient rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "patient not found");
    }

    #[tokio::test]
    async fn create_requires_an_existing_doctor() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let patient = store.seed_patient(owner);

        let err = service(store)
            .create(owner, patient.id, Uuid::new_v4())
            .await
            .expect_err("absent doctor rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "doctor not found");
    }

    #[tokio::test]
    async fn duplicate_assignment_is_a_conflict() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let patient = store.seed_patient(owner);
        let doctor = store.seed_doctor("d@doc.com");
        let service = service(store);

        service
            .create(owner, patient.id, doctor.id)
            .await
            .expect("first assignment succeeds");
        let err = service
            .create(owner, patient.id, doctor.id)
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn list_is_scoped_through_the_patient_join() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = store.seed_patient(owner);
        let theirs = store.seed_patient(other);
        let doctor = store.seed_doctor("d@doc.com");
        let service = service(store);

        service
            .create(owner, mine.id, doctor.id)
            .await
            .expect("own mapping");
        service
            .create(other, theirs.id, doctor.id)
            .await
            .expect("their mapping");

        let listed = service.list(owner).await.expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].patient_id, mine.id);
    }

    #[tokio::test]
    async fn doctors_for_patient_checks_ownership_first() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let patient = store.seed_patient(owner);
        let doctor = store.seed_doctor("d@doc.com");
        let service = service(store);

        service
            .create(owner, patient.id, doctor.id)
            .await
            .expect("assignment succeeds");

        let doctors = service
            .list_doctors_for_patient(owner, patient.id)
            .await
            .expect("owner may list");
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].id, doctor.id);

        let err = service
            .list_doctors_for_patient(intruder, patient.id)
            .await
            .expect_err("intruder may not list");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_resolves_ownership_through_the_patient() {
        let store = Arc::new(StubMappingRepository::default());
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let patient = store.seed_patient(owner);
        let doctor = store.seed_doctor("d@doc.com");
        let service = service(store.clone());

        let mapping = service
            .create(owner, patient.id, doctor.id)
            .await
            .expect("assignment succeeds");

        let err = service
            .delete(intruder, mapping.id)
            .await
            .expect_err("intruder may not delete");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(store.mappings.lock().expect("lock").len(), 1);

        service
            .delete(owner, mapping.id)
            .await
            .expect("owner may delete");
        assert!(store.mappings.lock().expect("lock").is_empty());
    }
}
