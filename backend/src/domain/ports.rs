//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database, token issuance, password hashing). Each trait exposes strongly
//! typed errors so adapters map their failures into predictable variants
//! instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::account::{EmailAddress, User};
use super::doctor::{Doctor, DoctorChanges, DoctorDraft};
use super::mapping::Mapping;
use super::patient::{Patient, PatientChanges, PatientDraft};
use super::Error;

/// Errors surfaced by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Database connectivity or pool checkout failures.
    #[error("persistence connection failed: {message}")]
    Connection { message: String },
    /// Query construction or execution failures.
    #[error("persistence query failed: {message}")]
    Query { message: String },
    /// A unique constraint rejected the write.
    #[error("duplicate record: {constraint}")]
    Duplicate { constraint: String },
}

impl PersistenceError {
    /// Helper for connection-level failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-constraint violations.
    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    /// Default mapping into the HTTP-safe taxonomy. Services that want a
    /// friendlier conflict message match [`PersistenceError::Duplicate`]
    /// before falling back to this conversion.
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::Connection { message } => Error::service_unavailable(message),
            PersistenceError::Query { message } => Error::internal(message),
            PersistenceError::Duplicate { constraint } => {
                Error::conflict(format!("duplicate record: {constraint}"))
            }
        }
    }
}

/// New account record handed to the repository at registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Account shape returned for credential checks.
///
/// The password hash stays inside the domain services; it is never
/// serialised.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub user: User,
    pub password_hash: String,
}

/// Persistence port for user accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Duplicate emails surface as
    /// [`PersistenceError::Duplicate`].
    async fn insert(&self, account: NewAccount) -> Result<User, PersistenceError>;

    /// Look up an account, with credentials, by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, PersistenceError>;
}

/// Persistence port for patients.
///
/// Every accessor takes the owning user id so scoping happens in the query
/// itself; no method can observe another user's rows.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Insert a patient owned by `owner`.
    async fn insert(&self, owner: Uuid, draft: PatientDraft) -> Result<Patient, PersistenceError>;

    /// All patients owned by `owner`, most recently created first.
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Patient>, PersistenceError>;

    /// A single patient, present only when it exists and is owned by `owner`.
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Patient>, PersistenceError>;

    /// Apply changes to an owned patient; `None` when absent or foreign.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PatientChanges,
    ) -> Result<Option<Patient>, PersistenceError>;

    /// Delete an owned patient, cascading to its mappings. Returns whether a
    /// row was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, PersistenceError>;
}

/// Persistence port for doctors. No ownership scoping by design.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Insert a doctor. Duplicate emails surface as
    /// [`PersistenceError::Duplicate`].
    async fn insert(&self, draft: DoctorDraft) -> Result<Doctor, PersistenceError>;

    /// All doctors, ordered by name.
    async fn list(&self) -> Result<Vec<Doctor>, PersistenceError>;

    /// A single doctor by id.
    async fn find(&self, id: Uuid) -> Result<Option<Doctor>, PersistenceError>;

    /// Apply changes to a doctor; `None` when absent.
    async fn update(
        &self,
        id: Uuid,
        changes: DoctorChanges,
    ) -> Result<Option<Doctor>, PersistenceError>;

    /// Delete a doctor. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// Persistence port for patient-doctor mappings.
///
/// Ownership never lives on the mapping row; the owner-scoped methods join
/// through the patients table on every call.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Insert a mapping. Duplicate `(patient_id, doctor_id)` pairs surface
    /// as [`PersistenceError::Duplicate`].
    async fn insert(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<Mapping, PersistenceError>;

    /// Whether the `(patient_id, doctor_id)` pair is already assigned.
    async fn exists(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<bool, PersistenceError>;

    /// All mappings whose patient is owned by `owner`.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Mapping>, PersistenceError>;

    /// Doctors assigned to the given patient.
    async fn doctors_for_patient(&self, patient_id: Uuid) -> Result<Vec<Doctor>, PersistenceError>;

    /// Delete a mapping whose patient is owned by `owner`. Returns whether a
    /// row was removed.
    async fn delete_owned(&self, mapping_id: Uuid, owner: Uuid) -> Result<bool, PersistenceError>;
}

/// Errors surfaced by the token adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token is malformed, wrongly signed, or of the wrong kind.
    #[error("token is invalid")]
    Invalid,
    /// Token signature is valid but the token has expired.
    #[error("token has expired")]
    Expired,
    /// Token issuance failed inside the adapter.
    #[error("token issuance failed: {message}")]
    Issue { message: String },
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Invalid | TokenError::Expired => {
                Error::unauthorized("invalid or expired token")
            }
            TokenError::Issue { message } => Error::internal(message),
        }
    }
}

/// Access and refresh tokens issued at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Port for the external token service.
///
/// The access token's subject carries the user id used for every ownership
/// check; signing and verification internals are the adapter's business.
pub trait TokenService: Send + Sync {
    /// Issue an access + refresh pair bound to `user_id`.
    fn issue(&self, user_id: Uuid) -> Result<TokenPair, TokenError>;

    /// Verify an access token and recover the bound user id.
    fn verify_access(&self, token: &str) -> Result<Uuid, TokenError>;
}

/// Errors surfaced by the password-hash adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    pub message: String,
}

impl PasswordHashError {
    /// Wrap an adapter failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        Error::internal(value.message)
    }
}

/// Port for password hashing and verification.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
