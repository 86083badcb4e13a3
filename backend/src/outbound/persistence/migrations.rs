//! Embedded schema migrations, applied once at startup.

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors surfaced while applying embedded migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Could not open a connection for the migration run.
    #[error("migration connection failed: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Apply { message: String },
}

/// Apply all pending embedded migrations over a short-lived synchronous
/// connection. Runs before the async pool is built, so blocking here is
/// acceptable.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    for version in &applied {
        info!(migration = %version, "applied migration");
    }
    Ok(())
}
