//! Argon2 password-hash adapter implementing the domain's hashing port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id implementation of the `PasswordHasher` port, using the crate's
/// recommended default parameters.
#[derive(Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::new(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash).map_err(|err| {
            PasswordHashError::new(format!("stored hash failed to parse: {err}"))
        })?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::new(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_then_verify_accepts_the_original_password() {
        let hasher = Argon2PasswordHasher::default();
        let hash = hasher.hash("correct horse battery staple").expect("hash");
        assert_eq!(
            hasher.verify("correct horse battery staple", &hash),
            Ok(true)
        );
    }

    #[rstest]
    fn verify_rejects_a_wrong_password() {
        let hasher = Argon2PasswordHasher::default();
        let hash = hasher.hash("hunter22334").expect("hash");
        assert_eq!(hasher.verify("hunter2", &hash), Ok(false));
    }

    #[rstest]
    fn hashes_are_salted_per_call() {
        let hasher = Argon2PasswordHasher::default();
        let first = hasher.hash("same password").expect("hash");
        let second = hasher.hash("same password").expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn corrupt_stored_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::default();
        assert!(hasher.verify("anything", "not-a-phc-string").is_err());
    }
}
