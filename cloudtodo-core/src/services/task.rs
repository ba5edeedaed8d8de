//! Task store - ownership-checked CRUD over the `tasks` collection
//!
//! Every record carries the id of the account that created it. Listing is
//! always scoped to one owner, and update/delete only go through when the
//! caller's id equals the stored owner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::{Outcome, Task, TaskChanges};
use crate::ports::{Document, DocumentDatabase, FieldValue, Fields};

/// Collection holding task documents
pub const TASKS_COLLECTION: &str = "tasks";

/// Stored field names
pub mod fields {
    pub const OWNER: &str = "user_uid";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const COMPLETED: &str = "completed";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Stored document body
#[derive(Debug, Deserialize)]
struct TaskDocument {
    user_uid: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    timestamp: DateTime<Utc>,
}

fn decode_task(doc: Document) -> Result<Task> {
    let body: TaskDocument = serde_json::from_value(JsonValue::Object(doc.fields))
        .map_err(|e| Error::storage(format!("Malformed task document {}: {}", doc.id, e)))?;

    Ok(Task {
        id: doc.id,
        owner_id: body.user_uid,
        title: body.title,
        description: body.description,
        completed: body.completed,
        last_modified: body.timestamp,
    })
}

/// Ownership-checked task CRUD built on a [`DocumentDatabase`]
pub struct TaskStore {
    db: Arc<dyn DocumentDatabase>,
    conceal_foreign_tasks: bool,
}

impl TaskStore {
    pub fn new(db: Arc<dyn DocumentDatabase>) -> Self {
        Self {
            db,
            conceal_foreign_tasks: false,
        }
    }

    /// Report other owners' tasks as `NotFound` instead of `Unauthorized`
    pub fn with_concealment(mut self, conceal: bool) -> Self {
        self.conceal_foreign_tasks = conceal;
        self
    }

    /// Create a task and return its id
    pub fn create(&self, owner_id: &str, title: &str, description: &str) -> Result<String> {
        if owner_id.is_empty() {
            return Err(Error::validation("Owner id must not be empty"));
        }

        let mut doc = Fields::new();
        doc.insert(fields::OWNER.to_string(), owner_id.into());
        doc.insert(fields::TITLE.to_string(), title.into());
        doc.insert(fields::DESCRIPTION.to_string(), description.into());
        doc.insert(fields::COMPLETED.to_string(), false.into());
        doc.insert(fields::TIMESTAMP.to_string(), FieldValue::ServerTimestamp);

        self.db.insert(TASKS_COLLECTION, doc)
    }

    /// All tasks owned by `owner_id`, in storage order
    pub fn list(&self, owner_id: &str) -> Result<Vec<Task>> {
        self.db
            .query_by_field(
                TASKS_COLLECTION,
                fields::OWNER,
                &JsonValue::String(owner_id.to_string()),
            )?
            .into_iter()
            .map(decode_task)
            .collect()
    }

    /// Apply a partial update to a task the caller owns
    pub fn update(&self, task_id: &str, owner_id: &str, changes: TaskChanges) -> Result<Outcome> {
        if let Some(refused) = self.check_ownership(task_id, owner_id)? {
            return Ok(refused);
        }

        if changes.is_empty() {
            return Ok(Outcome::NoOp);
        }

        let mut updates = Fields::new();
        if let Some(title) = changes.title {
            updates.insert(fields::TITLE.to_string(), title.into());
        }
        if let Some(description) = changes.description {
            updates.insert(fields::DESCRIPTION.to_string(), description.into());
        }
        if let Some(completed) = changes.completed {
            updates.insert(fields::COMPLETED.to_string(), completed.into());
        }
        updates.insert(fields::TIMESTAMP.to_string(), FieldValue::ServerTimestamp);

        self.db.update_fields(TASKS_COLLECTION, task_id, updates)?;
        Ok(Outcome::Updated)
    }

    /// Delete a task the caller owns
    pub fn delete(&self, task_id: &str, owner_id: &str) -> Result<Outcome> {
        if let Some(refused) = self.check_ownership(task_id, owner_id)? {
            return Ok(refused);
        }

        self.db.delete_by_id(TASKS_COLLECTION, task_id)?;
        Ok(Outcome::Deleted)
    }

    /// Existence first, then ownership; `None` means the caller may proceed
    fn check_ownership(&self, task_id: &str, owner_id: &str) -> Result<Option<Outcome>> {
        let doc = match self.db.get_by_id(TASKS_COLLECTION, task_id)? {
            Some(doc) => doc,
            None => return Ok(Some(Outcome::NotFound)),
        };

        if doc.get_str(fields::OWNER) != Some(owner_id) {
            return Ok(Some(if self.conceal_foreign_tasks {
                Outcome::NotFound
            } else {
                Outcome::Unauthorized
            }));
        }

        Ok(None)
    }
}
