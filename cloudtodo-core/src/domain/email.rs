//! Email address validation

use std::sync::OnceLock;

use regex::Regex;

use super::result::{Error, Result};

/// Message shown when an address fails validation
pub const INVALID_EMAIL_MESSAGE: &str =
    "Invalid email format. Please enter a valid email (example@domain.com).";

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is a valid regex")
    })
}

/// Check that `email` looks like `local@domain.tld`
///
/// This is a format check only; it does not confirm the mailbox exists.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validate and normalize an email (trimmed, lowercased)
pub fn normalize_email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if !is_valid_email(trimmed) {
        return Err(Error::validation(INVALID_EMAIL_MESSAGE));
    }
    Ok(trimmed.to_lowercase())
}
