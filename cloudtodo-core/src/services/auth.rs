//! Auth service - email validation plus login/registration

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{normalize_email, Account};
use crate::ports::IdentityProvider;

/// Login and registration against an [`IdentityProvider`]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    verify_password: bool,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            verify_password: false,
        }
    }

    /// Check the secret on login (off by default)
    pub fn with_password_verification(mut self, verify: bool) -> Self {
        self.verify_password = verify;
        self
    }

    /// Whether login checks the secret
    pub fn verifies_password(&self) -> bool {
        self.verify_password
    }

    /// Resolve an existing account by email
    ///
    /// Without password verification the secret is accepted as-is; the
    /// account lookup alone decides the login.
    pub fn login(&self, email: &str, secret: &str) -> Result<Account> {
        let email = normalize_email(email)?;
        let account = self
            .identity
            .find_by_email(&email)
            .map_err(|e| match e {
                Error::NotFound(_) => Error::not_found("User does not exist."),
                other => other,
            })?;

        if self.verify_password && !self.identity.verify_secret(&account.id, secret)? {
            return Err(Error::unauthorized("Incorrect password."));
        }

        Ok(account)
    }

    /// Create a new account
    pub fn register(&self, email: &str, secret: &str) -> Result<Account> {
        let email = normalize_email(email)?;
        self.identity
            .create_account(&email, secret)
            .map_err(|e| match e {
                Error::AlreadyExists(_) => {
                    Error::already_exists("Email already registered. Please log in instead.")
                }
                other => other,
            })
    }
}
