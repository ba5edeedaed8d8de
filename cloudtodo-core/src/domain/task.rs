//! Task domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A to-do item owned by exactly one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque document id assigned by the database
    pub id: String,
    /// Account that created the task; never reassigned
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Server-assigned, refreshed on every successful update
    pub last_modified: DateTime<Utc>,
}

/// Sparse set of field changes for an update
///
/// Fields left as `None` are not touched by the update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Result of a mutating task operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NotFound,
    Unauthorized,
    NoOp,
    Updated,
    Deleted,
}

impl Outcome {
    /// Message shown to the user for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::NotFound => "Task not found.",
            Outcome::Unauthorized => "Unauthorized action.",
            Outcome::NoOp => "No updates provided.",
            Outcome::Updated => "Task updated successfully!",
            Outcome::Deleted => "Task deleted successfully!",
        }
    }

    /// Short name used in event logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NotFound => "not_found",
            Outcome::Unauthorized => "unauthorized",
            Outcome::NoOp => "no_op",
            Outcome::Updated => "updated",
            Outcome::Deleted => "deleted",
        }
    }

    /// Whether the store performed a write
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Updated | Outcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_changes() {
        assert!(TaskChanges::new().is_empty());
        assert!(!TaskChanges::new().with_completed(false).is_empty());
        assert!(!TaskChanges::new().with_description("").is_empty());
    }

    #[test]
    fn test_builder_sets_only_named_fields() {
        let changes = TaskChanges::new().with_title("New");
        assert_eq!(changes.title.as_deref(), Some("New"));
        assert!(changes.description.is_none());
        assert!(changes.completed.is_none());
    }


    #[test]
    fn test_outcome_applied() {
        assert!(Outcome::Updated.is_applied());
        assert!(Outcome::Deleted.is_applied());
        assert!(!Outcome::NoOp.is_applied());
        assert!(!Outcome::Unauthorized.is_applied());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: "t1".to_string(),
            owner_id: "u1".to_string(),
            title: "Buy milk".to_string(),
            description: String::new(),
            completed: false,
            last_modified: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["ownerId"], "u1");
        assert!(json.get("lastModified").is_some());
    }
}
