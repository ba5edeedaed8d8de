//! Identity provider port

use crate::domain::result::Result;
use crate::domain::Account;

/// Minimum secret length accepted at registration
pub const MIN_SECRET_LEN: usize = 6;

/// Identity provider abstraction
///
/// Emails passed in are already validated and normalized by the caller.
pub trait IdentityProvider: Send + Sync {
    /// Provider name (e.g., "duckdb", "memory")
    fn name(&self) -> &str;

    /// Look up an account; [`crate::Error::NotFound`] when none exists
    fn find_by_email(&self, email: &str) -> Result<Account>;

    /// Create an account; [`crate::Error::AlreadyExists`] when the email is taken
    fn create_account(&self, email: &str, secret: &str) -> Result<Account>;

    /// Check a secret against the one stored at registration
    fn verify_secret(&self, account_id: &str, secret: &str) -> Result<bool>;
}
