//! Patient aggregate: entity, gender enumeration, and request inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::name::{NameValidationError, PersonName};

/// Inclusive lower bound for a patient's age.
pub const AGE_MIN: i32 = 1;
/// Inclusive upper bound for a patient's age.
pub const AGE_MAX: i32 = 130;

/// Validation errors raised when constructing patient inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatientValidationError {
    /// The full name is empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Age falls outside `AGE_MIN..=AGE_MAX`.
    #[error("age must be between {AGE_MIN} and {AGE_MAX}")]
    AgeOutOfRange,
    /// Gender is not one of the accepted spellings.
    #[error(
        "gender must be one of \"male\", \"female\", \"other\" \
         (case-insensitive, or single-letter \"M\", \"F\", \"O\")"
    )]
    InvalidGender,
}

impl From<NameValidationError> for PatientValidationError {
    fn from(value: NameValidationError) -> Self {
        match value {
            NameValidationError::Empty => Self::EmptyName,
        }
    }
}

/// Patient gender, normalised to the canonical lowercase spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Canonical lowercase spelling stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = PatientValidationError;

    /// Accept the common spellings case-insensitively: `male`/`m`,
    /// `female`/`f`, `other`/`o`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "o" | "other" => Ok(Self::Other),
            _ => Err(PatientValidationError::InvalidGender),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient record.
///
/// ## Invariants
/// - `owner_user_id` is set at creation to the requesting user and is never
///   reassigned. Every read and mutation must be scoped to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    /// Owning user; internal scoping datum, never serialised to clients.
    #[serde(skip)]
    #[schema(ignore)]
    pub owner_user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub address: String,
    pub medical_history: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a patient.
#[derive(Debug, Clone)]
pub struct PatientDraft {
    pub name: PersonName,
    pub age: i32,
    pub gender: Gender,
    pub address: String,
    pub medical_history: String,
}

impl PatientDraft {
    /// Validate raw creation fields.
    pub fn try_new(
        name: &str,
        age: i32,
        gender: &str,
        address: Option<String>,
        medical_history: Option<String>,
    ) -> Result<Self, PatientValidationError> {
        let name = PersonName::from_full_name(name)?;
        validate_age(age)?;
        let gender = gender.parse()?;
        Ok(Self {
            name,
            age,
            gender,
            address: address.unwrap_or_default(),
            medical_history: medical_history.unwrap_or_default(),
        })
    }
}

/// Validated partial update for a patient.
///
/// `None` fields are left untouched, so `PUT` behaves as a partial update
/// and clients send only the fields they want to change.
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub name: Option<PersonName>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientChanges {
    /// Validate raw update fields; absent fields stay unchanged.
    pub fn try_new(
        name: Option<&str>,
        age: Option<i32>,
        gender: Option<&str>,
        address: Option<String>,
        medical_history: Option<String>,
    ) -> Result<Self, PatientValidationError> {
        let name = name.map(PersonName::from_full_name).transpose()?;
        if let Some(age) = age {
            validate_age(age)?;
        }
        let gender = gender.map(str::parse).transpose()?;
        Ok(Self {
            name,
            age,
            gender,
            address,
            medical_history,
        })
    }

    /// True when no field is being changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.address.is_none()
            && self.medical_history.is_none()
    }
}

fn validate_age(age: i32) -> Result<(), PatientValidationError> {
    if (AGE_MIN..=AGE_MAX).contains(&age) {
        Ok(())
    } else {
        Err(PatientValidationError::AgeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("male", Gender::Male)]
    #[case("MALE", Gender::Male)]
    #[case("m", Gender::Male)]
    #[case("F", Gender::Female)]
    #[case(" female ", Gender::Female)]
    #[case("o", Gender::Other)]
    #[case("Other", Gender::Other)]
    fn gender_accepts_common_spellings(#[case] input: &str, #[case] expected: Gender) {
        assert_eq!(input.parse::<Gender>().expect("valid gender"), expected);
    }

    #[rstest]
    #[case("unknown")]
    #[case("")]
    #[case("x")]
    fn gender_rejects_unknown_spellings(#[case] input: &str) {
        assert_eq!(
            input.parse::<Gender>(),
            Err(PatientValidationError::InvalidGender)
        );
    }

    #[rstest]
    fn draft_splits_name_and_defaults_optionals() {
        let draft =
            PatientDraft::try_new("John Doe", 30, "male", None, None).expect("valid draft");
        assert_eq!(draft.name.first(), "John");
        assert_eq!(draft.name.last(), "Doe");
        assert_eq!(draft.address, "");
        assert_eq!(draft.medical_history, "");
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(131)]
    fn draft_rejects_out_of_range_age(#[case] age: i32) {
        assert_eq!(
            PatientDraft::try_new("John Doe", age, "male", None, None).expect_err("invalid age"),
            PatientValidationError::AgeOutOfRange
        );
    }

    #[rstest]
    fn changes_allow_sparse_updates() {
        let changes = PatientChanges::try_new(None, Some(25), Some("other"), None, None)
            .expect("valid changes");
        assert!(changes.name.is_none());
        assert_eq!(changes.age, Some(25));
        assert_eq!(changes.gender, Some(Gender::Other));
        assert!(!changes.is_empty());
        assert!(PatientChanges::default().is_empty());
    }

    #[rstest]
    fn changes_validate_present_fields() {
        assert_eq!(
            PatientChanges::try_new(Some("  "), None, None, None, None)
                .expect_err("blank name rejected"),
            PatientValidationError::EmptyName
        );
        assert_eq!(
            PatientChanges::try_new(None, None, Some("unknown"), None, None)
                .expect_err("bad gender rejected"),
            PatientValidationError::InvalidGender
        );
    }

    #[rstest]
    fn owner_is_not_serialised() {
        let patient = Patient {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::new_v4(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            age: 28,
            gender: Gender::Female,
            address: String::new(),
            medical_history: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let serialised = serde_json::to_value(&patient).expect("serialise patient");
        let object = serialised.as_object().expect("object");
        assert!(!object.contains_key("owner_user_id"));
        assert_eq!(serialised["gender"], "female");
    }
}
