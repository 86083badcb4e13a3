//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters stay thin: they translate between Diesel row structs and
//! domain entities and map database failures into
//! [`crate::domain::ports::PersistenceError`]. Row structs (`models.rs`) and
//! the schema definition (`schema.rs`) are internal and never leak to the
//! domain. Ownership scoping happens in the queries themselves, so a
//! repository cannot hand back another user's rows by mistake.

pub(crate) mod diesel_helpers;
mod diesel_account_repository;
mod diesel_doctor_repository;
mod diesel_mapping_repository;
mod diesel_patient_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_doctor_repository::DieselDoctorRepository;
pub use diesel_mapping_repository::DieselMappingRepository;
pub use diesel_patient_repository::DieselPatientRepository;
pub use migrations::{run_pending_migrations, MigrationError};
pub use pool::{DbPool, PoolConfig, PoolError};
