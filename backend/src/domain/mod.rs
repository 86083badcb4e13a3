//! Domain entities, ports, and the access-control services.
//!
//! Purpose: everything in here is transport and storage agnostic. Entities
//! carry validated data, ports describe what the domain needs from the
//! outside world, and the services decide ALLOW/DENY/NOT_FOUND for every
//! request before any store operation runs.

pub mod account;
pub mod account_service;
pub mod doctor;
pub mod doctor_service;
pub mod error;
pub mod mapping;
pub mod mapping_service;
pub mod memory;
pub mod name;
pub mod patient;
pub mod patient_service;
pub mod ports;

pub use self::account::{AccountValidationError, EmailAddress, RegisterForm, User};
pub use self::account_service::{AccountService, LoginOutcome};
pub use self::doctor::{Doctor, DoctorChanges, DoctorDraft, DoctorValidationError};
pub use self::doctor_service::DoctorService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::mapping::Mapping;
pub use self::mapping_service::MappingService;
pub use self::name::{NameValidationError, PersonName};
pub use self::patient::{
    Gender, Patient, PatientChanges, PatientDraft, PatientValidationError,
};
pub use self::patient_service::PatientService;

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
