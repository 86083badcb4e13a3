//! Account identity types and registration input validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Minimum allowed password length at registration.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validation errors raised when constructing account inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    /// The display name is empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// The email address does not have a plausible shape.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// The password is shorter than [`PASSWORD_MIN_LEN`] characters.
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    PasswordTooShort,
    /// `password_confirm` was supplied but does not match `password`.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Validated, lowercase email address.
///
/// Normalising to lowercase on construction makes the database unique index
/// behave case-insensitively without a functional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// The check is deliberately shallow: a non-empty local part and a dotted
    /// domain. Deliverability is the mail system's problem, not ours.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AccountValidationError::InvalidEmail);
        };
        let shape_ok = !local.is_empty()
            && !domain.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.contains(char::is_whitespace);
        if !shape_ok {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Normalised address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user account as exposed to clients.
///
/// The password hash never leaves the persistence layer; see
/// [`crate::domain::ports::StoredAccount`] for the credential-bearing shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    pub email: EmailAddress,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Validated registration input.
///
/// `password_confirm` is optional on the wire; when present and non-empty it
/// must match `password`.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    name: String,
    email: EmailAddress,
    password: String,
}

impl RegisterForm {
    /// Validate raw registration fields.
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        password_confirm: Option<&str>,
    ) -> Result<Self, AccountValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        let email = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AccountValidationError::PasswordTooShort);
        }
        if let Some(confirm) = password_confirm
            && !confirm.is_empty()
            && confirm != password
        {
            return Err(AccountValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            password: password.to_owned(),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, consumed by the hasher during registration.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
