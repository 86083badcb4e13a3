//! PostgreSQL-backed `PatientRepository` implementation using Diesel ORM.
//!
//! Every query filters on `owner_user_id`, so a patient belonging to another
//! user is indistinguishable from one that does not exist. Deleting a patient
//! cascades to its mappings through the foreign key.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PatientRepository, PersistenceError};
use crate::domain::{Patient, PatientChanges, PatientDraft};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewPatientRow, PatientChangesetRow, PatientRow};
use super::pool::DbPool;
use super::schema::patients;

/// Diesel-backed implementation of the `PatientRepository` port.
#[derive(Clone)]
pub struct DieselPatientRepository {
    pool: DbPool,
}

impl DieselPatientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for DieselPatientRepository {
    async fn insert(&self, owner: Uuid, draft: PatientDraft) -> Result<Patient, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (first_name, last_name) = draft.name.into_parts();
        let row = NewPatientRow {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            first_name: &first_name,
            last_name: &last_name,
            age: draft.age,
            gender: draft.gender.as_str(),
            address: &draft.address,
            medical_history: &draft.medical_history,
        };
        let inserted: PatientRow = diesel::insert_into(patients::table)
            .values(&row)
            .returning(PatientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        inserted.into_domain()
    }

    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Patient>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PatientRow> = patients::table
            .filter(patients::owner_user_id.eq(owner))
            .order(patients::created_at.desc())
            .select(PatientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(PatientRow::into_domain).collect()
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Patient>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PatientRow> = patients::table
            .filter(patients::id.eq(id))
            .filter(patients::owner_user_id.eq(owner))
            .select(PatientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PatientRow::into_domain).transpose()
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PatientChanges,
    ) -> Result<Option<Patient>, PersistenceError> {
        // An all-None changeset is a query builder error in Diesel, and a
        // no-op update still needs to report whether the row exists.
        if changes.is_empty() {
            return self.find_owned(id, owner).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = PatientChangesetRow::from(changes);
        let target = patients::table
            .filter(patients::id.eq(id))
            .filter(patients::owner_user_id.eq(owner));
        let row: Option<PatientRow> = diesel::update(target)
            .set((&changeset, patients::updated_at.eq(Utc::now())))
            .returning(PatientRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PatientRow::into_domain).transpose()
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = patients::table
            .filter(patients::id.eq(id))
            .filter(patients::owner_user_id.eq(owner));
        let removed = diesel::delete(target)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
