//! Person name handling shared by patients, doctors, and accounts.
//!
//! The HTTP surface accepts a single full-name field on create and update;
//! stored records keep the split `first_name`/`last_name` pair. The split is
//! a naive cut on the first space, matching the API contract.

use thiserror::Error;

/// Validation errors raised when parsing a full name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
    /// The supplied name is empty once trimmed of whitespace.
    #[error("name must not be empty")]
    Empty,
}

/// A person's name split into first and last parts.
///
/// `last` may be empty when the full name contains no space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    /// Split a full name on the first space.
    ///
    /// # Examples
    /// ```
    /// use healthcare_backend::domain::PersonName;
    ///
    /// let name = PersonName::from_full_name("John Ronald Doe").expect("valid name");
    /// assert_eq!(name.first(), "John");
    /// assert_eq!(name.last(), "Ronald Doe");
    ///
    /// let single = PersonName::from_full_name("Mononym").expect("valid name");
    /// assert_eq!(single.first(), "Mononym");
    /// assert_eq!(single.last(), "");
    /// ```
    pub fn from_full_name(full_name: &str) -> Result<Self, NameValidationError> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return Err(NameValidationError::Empty);
        }
        let (first, last) = match trimmed.split_once(' ') {
            Some((first, last)) => (first.to_owned(), last.trim_start().to_owned()),
            None => (trimmed.to_owned(), String::new()),
        };
        Ok(Self { first, last })
    }

    /// First name component.
    pub fn first(&self) -> &str {
        self.first.as_str()
    }

    /// Last name component; empty for single-word names.
    pub fn last(&self) -> &str {
        self.last.as_str()
    }

    /// Decompose into the `(first, last)` pair.
    pub fn into_parts(self) -> (String, String) {
        (self.first, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("John Doe", "John", "Doe")]
    #[case("SingleName", "SingleName", "")]
    #[case("  Ada   Lovelace  ", "Ada", "Lovelace")]
    #[case("A B C", "A", "B C")]
    fn splits_on_first_space(#[case] input: &str, #[case] first: &str, #[case] last: &str) {
        let name = PersonName::from_full_name(input).expect("valid name");
        assert_eq!(name.first(), first);
        assert_eq!(name.last(), last);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_input(#[case] input: &str) {
        assert_eq!(
            PersonName::from_full_name(input),
            Err(NameValidationError::Empty)
        );
    }
}
