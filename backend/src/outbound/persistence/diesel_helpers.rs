//! Shared mapping from Diesel and pool failures to persistence errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> PersistenceError {
    PersistenceError::connection(error.to_string())
}

pub(super) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            PersistenceError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        other => PersistenceError::query(other.to_string()),
    }
}
