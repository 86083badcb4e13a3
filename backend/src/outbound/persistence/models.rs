//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain entities live
//! here so invalid stored data (an unknown gender spelling, a corrupt email)
//! surfaces as a query error instead of a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{Doctor, EmailAddress, Mapping, Patient, User};

use super::schema::{doctors, mappings, patients, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field; accounts are immutable after creation")]
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, PersistenceError> {
        let email = EmailAddress::new(&self.email).map_err(|err| {
            PersistenceError::query(format!("stored email failed validation: {err}"))
        })?;
        Ok(User {
            id: self.id,
            email,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

/// Row struct for reading from the patients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub medical_history: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRow {
    pub(crate) fn into_domain(self) -> Result<Patient, PersistenceError> {
        let gender = self.gender.parse().map_err(|err| {
            PersistenceError::query(format!("stored gender failed validation: {err}"))
        })?;
        Ok(Patient {
            id: self.id,
            owner_user_id: self.owner_user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            gender,
            address: self.address,
            medical_history: self.medical_history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating new patient records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
pub(crate) struct NewPatientRow<'a> {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: i32,
    pub gender: &'a str,
    pub address: &'a str,
    pub medical_history: &'a str,
}

/// Changeset for partial patient updates; `None` fields are untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = patients)]
pub(crate) struct PatientChangesetRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

impl From<crate::domain::PatientChanges> for PatientChangesetRow {
    fn from(changes: crate::domain::PatientChanges) -> Self {
        let (first_name, last_name) = match changes.name {
            Some(name) => {
                let (first, last) = name.into_parts();
                (Some(first), Some(last))
            }
            None => (None, None),
        };
        Self {
            first_name,
            last_name,
            age: changes.age,
            gender: changes.gender.map(|g| g.as_str().to_owned()),
            address: changes.address,
            medical_history: changes.medical_history,
        }
    }
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

/// Row struct for reading from the doctors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
    pub phone_number: String,
    pub experience_years: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorRow {
    pub(crate) fn into_domain(self) -> Result<Doctor, PersistenceError> {
        let email = EmailAddress::new(&self.email).map_err(|err| {
            PersistenceError::query(format!("stored email failed validation: {err}"))
        })?;
        Ok(Doctor {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            specialization: self.specialization,
            email,
            phone_number: self.phone_number,
            experience_years: self.experience_years,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating new doctor records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub(crate) struct NewDoctorRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub specialization: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub experience_years: i32,
}

/// Changeset for partial doctor updates; `None` fields are untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = doctors)]
pub(crate) struct DoctorChangesetRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub experience_years: Option<i32>,
}

impl From<crate::domain::DoctorChanges> for DoctorChangesetRow {
    fn from(changes: crate::domain::DoctorChanges) -> Self {
        let (first_name, last_name) = match changes.name {
            Some(name) => {
                let (first, last) = name.into_parts();
                (Some(first), Some(last))
            }
            None => (None, None),
        };
        Self {
            first_name,
            last_name,
            specialization: changes.specialization,
            email: changes.email.map(String::from),
            phone_number: changes.phone_number,
            experience_years: changes.experience_years,
        }
    }
}

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

/// Row struct for reading from the mappings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mappings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MappingRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Self {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            created_at: row.created_at,
        }
    }
}

/// Insertable struct for creating new mapping records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mappings)]
pub(crate) struct NewMappingRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}
