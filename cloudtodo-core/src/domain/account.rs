//! Account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An identity-provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = Account::new("user-123", "test@example.com");
        assert_eq!(account.id, "user-123");
        assert_eq!(account.email, "test@example.com");
    }
}
