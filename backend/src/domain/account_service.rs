//! Registration and login use-cases.

use std::sync::Arc;

use tracing::info;

use super::account::{EmailAddress, RegisterForm, User};
use super::ports::{
    AccountRepository, NewAccount, PasswordHasher, PersistenceError, TokenService,
};
use super::Error;

/// Successful login payload: token pair plus the authenticated user.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Account use-cases: register a new user, exchange credentials for tokens.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    /// Create a new service over its ports.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// - `conflict` when the email is already registered.
    /// - `internal_error` when hashing fails.
    pub async fn register(&self, form: RegisterForm) -> Result<User, Error> {
        let password_hash = self.hasher.hash(form.password())?;
        let record = NewAccount {
            name: form.name().to_owned(),
            email: form.email().clone(),
            password_hash,
        };
        let user = self.accounts.insert(record).await.map_err(|err| match err {
            PersistenceError::Duplicate { .. } => {
                Error::conflict("a user with this email already exists")
            }
            other => other.into(),
        })?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Exchange email + password for an access/refresh token pair.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the
    /// caller; both fail with `unauthorized`.
    pub async fn login(&self, email: &EmailAddress, password: &str) -> Result<LoginOutcome, Error> {
        let Some(stored) = self.accounts.find_by_email(email).await? else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !self.hasher.verify(password, &stored.password_hash)? {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let pair = self.tokens.issue(stored.user.id)?;
        info!(user_id = %stored.user.id, "login succeeded");
        Ok(LoginOutcome {
            access: pair.access,
            refresh: pair.refresh,
            user: stored.user,
        })
    }
}
