//! Mapping of domain validation failures to request errors.
//!
//! Each helper pins the offending field in the error details so clients can
//! highlight the right input without parsing the message.

use serde_json::json;

use crate::domain::{
    AccountValidationError, DoctorValidationError, Error, PatientValidationError,
};

fn field_error(error: &impl std::fmt::Display, field: &str) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

pub(crate) fn account_error(error: AccountValidationError) -> Error {
    let field = match error {
        AccountValidationError::EmptyName => "name",
        AccountValidationError::InvalidEmail => "email",
        AccountValidationError::PasswordTooShort => "password",
        AccountValidationError::PasswordMismatch => "password_confirm",
    };
    field_error(&error, field)
}

pub(crate) fn patient_error(error: PatientValidationError) -> Error {
    let field = match error {
        PatientValidationError::EmptyName => "name",
        PatientValidationError::AgeOutOfRange => "age",
        PatientValidationError::InvalidGender => "gender",
    };
    field_error(&error, field)
}

pub(crate) fn doctor_error(error: DoctorValidationError) -> Error {
    let field = match error {
        DoctorValidationError::EmptyName => "name",
        DoctorValidationError::EmptySpecialization => "specialization",
        DoctorValidationError::InvalidEmail => "email",
        DoctorValidationError::NegativeExperience => "experience_years",
    };
    field_error(&error, field)
}
