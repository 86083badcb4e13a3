//! PostgreSQL-backed `DoctorRepository` implementation using Diesel ORM.
//!
//! Doctors are a shared directory with no ownership column, so nothing here
//! is scoped by user. Email uniqueness is enforced by `doctors_email_key`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DoctorRepository, PersistenceError};
use crate::domain::{Doctor, DoctorChanges, DoctorDraft};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{DoctorChangesetRow, DoctorRow, NewDoctorRow};
use super::pool::DbPool;
use super::schema::doctors;

/// Diesel-backed implementation of the `DoctorRepository` port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    pool: DbPool,
}

impl DieselDoctorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn insert(&self, draft: DoctorDraft) -> Result<Doctor, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (first_name, last_name) = draft.name.into_parts();
        let row = NewDoctorRow {
            id: Uuid::new_v4(),
            first_name: &first_name,
            last_name: &last_name,
            specialization: &draft.specialization,
            email: draft.email.as_str(),
            phone_number: &draft.phone_number,
            experience_years: draft.experience_years,
        };
        let inserted: DoctorRow = diesel::insert_into(doctors::table)
            .values(&row)
            .returning(DoctorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        inserted.into_domain()
    }

    async fn list(&self) -> Result<Vec<Doctor>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DoctorRow> = doctors::table
            .order((doctors::first_name.asc(), doctors::last_name.asc()))
            .select(DoctorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(DoctorRow::into_domain).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<Doctor>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DoctorRow> = doctors::table
            .filter(doctors::id.eq(id))
            .select(DoctorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DoctorRow::into_domain).transpose()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: DoctorChanges,
    ) -> Result<Option<Doctor>, PersistenceError> {
        if changes.is_empty() {
            return self.find(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = DoctorChangesetRow::from(changes);
        let row: Option<DoctorRow> = diesel::update(doctors::table.filter(doctors::id.eq(id)))
            .set((&changeset, doctors::updated_at.eq(Utc::now())))
            .returning(DoctorRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DoctorRow::into_domain).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(doctors::table.filter(doctors::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
