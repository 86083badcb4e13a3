//! Doctor aggregate: entity and request inputs.
//!
//! Doctors have no owner. Any authenticated user may create, update, or
//! delete any doctor record; reads are public. This flat trust model is
//! deliberate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::account::{AccountValidationError, EmailAddress};
use super::name::{NameValidationError, PersonName};

/// Validation errors raised when constructing doctor inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoctorValidationError {
    /// The full name is empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// The specialization is empty once trimmed.
    #[error("specialization must not be empty")]
    EmptySpecialization,
    /// The email address does not have a plausible shape.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Years of experience cannot be negative.
    #[error("experience_years must not be negative")]
    NegativeExperience,
}

impl From<NameValidationError> for DoctorValidationError {
    fn from(value: NameValidationError) -> Self {
        match value {
            NameValidationError::Empty => Self::EmptyName,
        }
    }
}

impl From<AccountValidationError> for DoctorValidationError {
    fn from(_: AccountValidationError) -> Self {
        Self::InvalidEmail
    }
}

/// Doctor record, globally readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Doctor {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "Cardiology")]
    pub specialization: String,
    pub email: EmailAddress,
    pub phone_number: String,
    pub experience_years: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a doctor.
#[derive(Debug, Clone)]
pub struct DoctorDraft {
    pub name: PersonName,
    pub specialization: String,
    pub email: EmailAddress,
    pub phone_number: String,
    pub experience_years: i32,
}

impl DoctorDraft {
    /// Validate raw creation fields.
    pub fn try_new(
        name: &str,
        specialization: &str,
        email: &str,
        phone_number: Option<String>,
        experience_years: Option<i32>,
    ) -> Result<Self, DoctorValidationError> {
        let name = PersonName::from_full_name(name)?;
        let specialization = specialization.trim();
        if specialization.is_empty() {
            return Err(DoctorValidationError::EmptySpecialization);
        }
        let email = EmailAddress::new(email)?;
        let experience_years = experience_years.unwrap_or(0);
        if experience_years < 0 {
            return Err(DoctorValidationError::NegativeExperience);
        }
        Ok(Self {
            name,
            specialization: specialization.to_owned(),
            email,
            phone_number: phone_number.unwrap_or_default(),
            experience_years,
        })
    }
}

/// Validated partial update for a doctor; `None` fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct DoctorChanges {
    pub name: Option<PersonName>,
    pub specialization: Option<String>,
    pub email: Option<EmailAddress>,
    pub phone_number: Option<String>,
    pub experience_years: Option<i32>,
}

impl DoctorChanges {
    /// Validate raw update fields; absent fields stay unchanged.
    pub fn try_new(
        name: Option<&str>,
        specialization: Option<String>,
        email: Option<&str>,
        phone_number: Option<String>,
        experience_years: Option<i32>,
    ) -> Result<Self, DoctorValidationError> {
        let name = name.map(PersonName::from_full_name).transpose()?;
        if let Some(specialization) = specialization.as_deref()
            && specialization.trim().is_empty()
        {
            return Err(DoctorValidationError::EmptySpecialization);
        }
        let email = email.map(EmailAddress::new).transpose()?;
        if let Some(years) = experience_years
            && years < 0
        {
            return Err(DoctorValidationError::NegativeExperience);
        }
        Ok(Self {
            name,
            specialization,
            email,
            phone_number,
            experience_years,
        })
    }

    /// True when no field is being changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.specialization.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.experience_years.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn draft_defaults_phone_and_experience() {
        let draft = DoctorDraft::try_new("Jane Smith", "Cardiology", "jane@hospital.com", None, None)
            .expect("valid draft");
        assert_eq!(draft.name.first(), "Jane");
        assert_eq!(draft.name.last(), "Smith");
        assert_eq!(draft.phone_number, "");
        assert_eq!(draft.experience_years, 0);
    }

    #[rstest]
    #[case("", "GP", "a@b.com", DoctorValidationError::EmptyName)]
    #[case("Jane Smith", "  ", "a@b.com", DoctorValidationError::EmptySpecialization)]
    #[case("Jane Smith", "GP", "bad-email", DoctorValidationError::InvalidEmail)]
    fn draft_rejects_invalid_fields(
        #[case] name: &str,
        #[case] specialization: &str,
        #[case] email: &str,
        #[case] expected: DoctorValidationError,
    ) {
        let error = DoctorDraft::try_new(name, specialization, email, None, None)
            .expect_err("draft must be rejected");
        assert_eq!(error, expected);
    }

    #[rstest]
    fn draft_rejects_negative_experience() {
        let error = DoctorDraft::try_new("Jane Smith", "GP", "a@b.com", None, Some(-1))
            .expect_err("negative experience rejected");
        assert_eq!(error, DoctorValidationError::NegativeExperience);
    }

    #[rstest]
    fn changes_normalise_email_case() {
        let changes = DoctorChanges::try_new(None, None, Some("G@DOC.COM"), None, None)
            .expect("valid changes");
        assert_eq!(
            changes.email.as_ref().map(EmailAddress::as_ref),
            Some("g@doc.com")
        );
        assert!(!changes.is_empty());
    }
}
