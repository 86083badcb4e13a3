//! PostgreSQL-backed `MappingRepository` implementation using Diesel ORM.
//!
//! Ownership is never stored on the mapping row. The owner-scoped queries
//! resolve it on every call by joining (or sub-selecting) through the
//! patients table, so mappings change hands automatically if a patient ever
//! does.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MappingRepository, PersistenceError};
use crate::domain::{Doctor, Mapping};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{DoctorRow, MappingRow, NewMappingRow};
use super::pool::DbPool;
use super::schema::{doctors, mappings, patients};

/// Diesel-backed implementation of the `MappingRepository` port.
#[derive(Clone)]
pub struct DieselMappingRepository {
    pool: DbPool,
}

impl DieselMappingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for DieselMappingRepository {
    async fn insert(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<Mapping, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMappingRow {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
        };
        let inserted: MappingRow = diesel::insert_into(mappings::table)
            .values(&row)
            .returning(MappingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted.into())
    }

    async fn exists(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let assignment = mappings::table
            .filter(mappings::patient_id.eq(patient_id))
            .filter(mappings::doctor_id.eq(doctor_id));
        diesel::select(exists(assignment))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Mapping>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MappingRow> = mappings::table
            .inner_join(patients::table)
            .filter(patients::owner_user_id.eq(owner))
            .order(mappings::created_at.desc())
            .select(MappingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Mapping::from).collect())
    }

    async fn doctors_for_patient(&self, patient_id: Uuid) -> Result<Vec<Doctor>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DoctorRow> = mappings::table
            .inner_join(doctors::table)
            .filter(mappings::patient_id.eq(patient_id))
            .order((doctors::first_name.asc(), doctors::last_name.asc()))
            .select(DoctorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(DoctorRow::into_domain).collect()
    }

    async fn delete_owned(&self, mapping_id: Uuid, owner: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned_patients = patients::table
            .filter(patients::owner_user_id.eq(owner))
            .select(patients::id);
        let target = mappings::table
            .filter(mappings::id.eq(mapping_id))
            .filter(mappings::patient_id.eq_any(owned_patients));
        let removed = diesel::delete(target)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
