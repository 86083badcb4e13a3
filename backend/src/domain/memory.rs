//! In-memory implementations of the persistence ports.
//!
//! Used by handler and integration tests, and as the fallback store when the
//! server runs without a database. They honour the same contracts as the
//! Diesel adapters: unique emails, unique patient-doctor pairs, owner
//! scoping in every query, and mapping removal when a patient or doctor
//! goes away.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::doctor::{Doctor, DoctorChanges, DoctorDraft};
use super::mapping::Mapping;
use super::patient::{Patient, PatientChanges, PatientDraft};
use super::ports::{
    AccountRepository, DoctorRepository, MappingRepository, NewAccount, PatientRepository,
    PersistenceError, StoredAccount,
};
use super::{EmailAddress, User};

#[derive(Default)]
struct Tables {
    accounts: Mutex<Vec<StoredAccount>>,
    patients: Mutex<Vec<Patient>>,
    doctors: Mutex<Vec<Doctor>>,
    mappings: Mutex<Vec<Mapping>>,
}

/// One in-memory dataset. The repositories it hands out all operate on the
/// same tables, so cross-table behaviour (ownership joins, cascades on
/// patient and doctor deletion) matches what the foreign keys do in SQL.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    /// Account repository view over this dataset.
    #[must_use]
    pub fn accounts(&self) -> InMemoryAccountRepository {
        InMemoryAccountRepository {
            tables: self.tables.clone(),
        }
    }

    /// Patient repository view over this dataset.
    #[must_use]
    pub fn patients(&self) -> InMemoryPatientRepository {
        InMemoryPatientRepository {
            tables: self.tables.clone(),
        }
    }

    /// Doctor repository view over this dataset.
    #[must_use]
    pub fn doctors(&self) -> InMemoryDoctorRepository {
        InMemoryDoctorRepository {
            tables: self.tables.clone(),
        }
    }

    /// Mapping repository view over this dataset.
    #[must_use]
    pub fn mappings(&self) -> InMemoryMappingRepository {
        InMemoryMappingRepository {
            tables: self.tables.clone(),
        }
    }
}

/// In-memory `AccountRepository`.
pub struct InMemoryAccountRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<User, PersistenceError> {
        let mut accounts = self.tables.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.iter().any(|a| a.user.email == account.email) {
            return Err(PersistenceError::duplicate("users_email_key"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: account.email,
            name: account.name,
            created_at: Utc::now(),
        };
        accounts.push(StoredAccount {
            user: user.clone(),
            password_hash: account.password_hash,
        });
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, PersistenceError> {
        let accounts = self.tables.accounts.lock().unwrap_or_else(|e| e.into_inner());
        Ok(accounts.iter().find(|a| &a.user.email == email).cloned())
    }
}

/// In-memory `PatientRepository`, with mapping cleanup mirroring the
/// database's `ON DELETE CASCADE`.
pub struct InMemoryPatientRepository {
    tables: Arc<Tables>,
}

impl InMemoryPatientRepository {
    fn apply(patient: &mut Patient, changes: PatientChanges) {
        if let Some(name) = changes.name {
            let (first, last) = name.into_parts();
            patient.first_name = first;
            patient.last_name = last;
        }
        if let Some(age) = changes.age {
            patient.age = age;
        }
        if let Some(gender) = changes.gender {
            patient.gender = gender;
        }
        if let Some(address) = changes.address {
            patient.address = address;
        }
        if let Some(history) = changes.medical_history {
            patient.medical_history = history;
        }
        patient.updated_at = Utc::now();
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn insert(&self, owner: Uuid, draft: PatientDraft) -> Result<Patient, PersistenceError> {
        let now = Utc::now();
        let (first_name, last_name) = draft.name.into_parts();
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
        self.tables
            .patients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(patient.clone());
        Ok(patient)
    }

    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Patient>, PersistenceError> {
        let patients = self.tables.patients.lock().unwrap_or_else(|e| e.into_inner());
        let mut owned: Vec<Patient> = patients
            .iter()
            .filter(|p| p.owner_user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Patient>, PersistenceError> {
        let patients = self.tables.patients.lock().unwrap_or_else(|e| e.into_inner());
        Ok(patients
            .iter()
            .find(|p| p.id == id && p.owner_user_id == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PatientChanges,
    ) -> Result<Option<Patient>, PersistenceError> {
        let mut patients = self.tables.patients.lock().unwrap_or_else(|e| e.into_inner());
        let Some(patient) = patients
            .iter_mut()
            .find(|p| p.id == id && p.owner_user_id == owner)
        else {
            return Ok(None);
        };
        Self::apply(patient, changes);
        Ok(Some(patient.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, PersistenceError> {
        let mut patients = self.tables.patients.lock().unwrap_or_else(|e| e.into_inner());
        let before = patients.len();
        patients.retain(|p| !(p.id == id && p.owner_user_id == owner));
        let removed = patients.len() < before;
        if removed {
            self.tables
                .mappings
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|m| m.patient_id != id);
        }
        Ok(removed)
    }
}

/// In-memory `DoctorRepository`, with mapping cleanup mirroring the
/// database's `ON DELETE CASCADE`.
pub struct InMemoryDoctorRepository {
    tables: Arc<Tables>,
}

impl InMemoryDoctorRepository {
    fn apply(doctor: &mut Doctor, changes: DoctorChanges) {
        if let Some(name) = changes.name {
            let (first, last) = name.into_parts();
            doctor.first_name = first;
            doctor.last_name = last;
        }
        if let Some(specialization) = changes.specialization {
            doctor.specialization = specialization;
        }
        if let Some(email) = changes.email {
            doctor.email = email;
        }
        if let Some(phone_number) = changes.phone_number {
            doctor.phone_number = phone_number;
        }
        if let Some(years) = changes.experience_years {
            doctor.experience_years = years;
        }
        doctor.updated_at = Utc::now();
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn insert(&self, draft: DoctorDraft) -> Result<Doctor, PersistenceError> {
        let mut doctors = self.tables.doctors.lock().unwrap_or_else(|e| e.into_inner());
        if doctors.iter().any(|d| d.email == draft.email) {
            return Err(PersistenceError::duplicate("doctors_email_key"));
        }
        let now = Utc::now();
        let (first_name, last_name) = draft.name.into_parts();
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
        doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn list(&self) -> Result<Vec<Doctor>, PersistenceError> {
        let mut doctors = self
            .tables
            .doctors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        doctors.sort_by(|a, b| {
            (a.first_name.as_str(), a.last_name.as_str())
                .cmp(&(b.first_name.as_str(), b.last_name.as_str()))
        });
        Ok(doctors)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Doctor>, PersistenceError> {
        let doctors = self.tables.doctors.lock().unwrap_or_else(|e| e.into_inner());
        Ok(doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: DoctorChanges,
    ) -> Result<Option<Doctor>, PersistenceError> {
        let mut doctors = self.tables.doctors.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(email) = &changes.email
            && doctors.iter().any(|d| d.id != id && &d.email == email)
        {
            return Err(PersistenceError::duplicate("doctors_email_key"));
        }
        let Some(doctor) = doctors.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        Self::apply(doctor, changes);
        Ok(Some(doctor.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut doctors = self.tables.doctors.lock().unwrap_or_else(|e| e.into_inner());
        let before = doctors.len();
        doctors.retain(|d| d.id != id);
        let removed = doctors.len() < before;
        if removed {
            self.tables
                .mappings
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|m| m.doctor_id != id);
        }
        Ok(removed)
    }
}

/// In-memory `MappingRepository`.
///
/// The owner-scoped queries resolve ownership through the shared patient
/// table the same way the SQL joins do.
pub struct InMemoryMappingRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn insert(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<Mapping, PersistenceError> {
        let mut mappings = self.tables.mappings.lock().unwrap_or_else(|e| e.into_inner());
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

    async fn exists(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<bool, PersistenceError> {
        let mappings = self.tables.mappings.lock().unwrap_or_else(|e| e.into_inner());
        Ok(mappings
            .iter()
            .any(|m| m.patient_id == patient_id && m.doctor_id == doctor_id))
    }

    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Mapping>, PersistenceError> {
        let owned: Vec<Uuid> = self
            .tables
            .patients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|p| p.owner_user_id == owner)
            .map(|p| p.id)
            .collect();
        let mappings = self.tables.mappings.lock().unwrap_or_else(|e| e.into_inner());
        let mut result: Vec<Mapping> = mappings
            .iter()
            .filter(|m| owned.contains(&m.patient_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn doctors_for_patient(&self, patient_id: Uuid) -> Result<Vec<Doctor>, PersistenceError> {
        let doctor_ids: Vec<Uuid> = self
            .tables
            .mappings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| m.patient_id == patient_id)
            .map(|m| m.doctor_id)
            .collect();
        let mut assigned: Vec<Doctor> = self
            .tables
            .doctors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|d| doctor_ids.contains(&d.id))
            .cloned()
            .collect();
        assigned.sort_by(|a, b| {
            (a.first_name.as_str(), a.last_name.as_str())
                .cmp(&(b.first_name.as_str(), b.last_name.as_str()))
        });
        Ok(assigned)
    }

    async fn delete_owned(&self, mapping_id: Uuid, owner: Uuid) -> Result<bool, PersistenceError> {
        let owned: Vec<Uuid> = self
            .tables
            .patients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|p| p.owner_user_id == owner)
            .map(|p| p.id)
            .collect();
        let mut mappings = self.tables.mappings.lock().unwrap_or_else(|e| e.into_inner());
        let before = mappings.len();
        mappings.retain(|m| !(m.id == mapping_id && owned.contains(&m.patient_id)));
        Ok(mappings.len() < before)
    }
}
