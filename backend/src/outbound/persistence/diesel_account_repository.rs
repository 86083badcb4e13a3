//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `users_email_key` index; violations
//! surface as [`PersistenceError::Duplicate`] so the account service can
//! report a conflict without a racy pre-check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, NewAccount, PersistenceError, StoredAccount};
use crate::domain::{EmailAddress, User};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<User, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: account.email.as_str(),
            password_hash: &account.password_hash,
            name: &account.name,
        };
        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        inserted.into_domain()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            let password_hash = row.password_hash.clone();
            Ok(StoredAccount {
                user: row.into_domain()?,
                password_hash,
            })
        })
        .transpose()
    }
}
