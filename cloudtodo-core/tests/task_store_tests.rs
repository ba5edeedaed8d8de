//! Integration tests for the task store contract
//!
//! Every property runs against both the in-memory adapter and a real DuckDB
//! file so the two backends cannot drift apart.
//!
//! Run with: cargo test --test task_store_tests -- --nocapture

use std::sync::Arc;

use tempfile::TempDir;

use cloudtodo_core::adapters::{DuckDbStore, InMemoryDocumentDatabase};
use cloudtodo_core::ports::DocumentDatabase;
use cloudtodo_core::services::{TaskStore, TASKS_COLLECTION};
use cloudtodo_core::{Outcome, Task, TaskChanges};

// ============================================================================
// Test Helpers
// ============================================================================

/// A document database plus whatever keeps it alive
struct Backend {
    name: &'static str,
    db: Arc<dyn DocumentDatabase>,
    _dir: Option<TempDir>,
}

fn backends() -> Vec<Backend> {
    let dir = TempDir::new().unwrap();
    let duck = DuckDbStore::new(&dir.path().join("tasks.duckdb")).expect("open duckdb");
    duck.ensure_schema().expect("schema");

    vec![
        Backend {
            name: "memory",
            db: Arc::new(InMemoryDocumentDatabase::new()),
            _dir: None,
        },
        Backend {
            name: "duckdb",
            db: Arc::new(duck),
            _dir: Some(dir),
        },
    ]
}

fn find(tasks: &[Task], id: &str) -> Task {
    tasks
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .expect("task should be listed")
}

/// Raw stored document, for byte-level before/after comparisons
fn snapshot(db: &Arc<dyn DocumentDatabase>, id: &str) -> Option<String> {
    db.get_by_id(TASKS_COLLECTION, id)
        .unwrap()
        .map(|doc| serde_json::Value::Object(doc.fields).to_string())
}

// ============================================================================
// Create / List
// ============================================================================

#[test]
fn test_create_then_list_round_trip() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("o", "T", "D").unwrap();

        let tasks = store.list("o").unwrap();
        assert_eq!(tasks.len(), 1, "[{}] exactly one task", backend.name);
        let task = &tasks[0];
        assert_eq!(task.id, id);
        assert_eq!(task.owner_id, "o");
        assert_eq!(task.title, "T");
        assert_eq!(task.description, "D");
        assert!(!task.completed, "[{}] new tasks are open", backend.name);
    }
}

#[test]
fn test_list_is_scoped_to_owner() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let a1 = store.create("alice", "A1", "").unwrap();
        let a2 = store.create("alice", "A2", "").unwrap();
        store.create("bob", "B1", "").unwrap();

        let mut ids: Vec<_> = store.list("alice").unwrap().into_iter().map(|t| t.id).collect();
        ids.sort();
        let mut expected = vec![a1, a2];
        expected.sort();
        assert_eq!(ids, expected, "[{}]", backend.name);

        assert_eq!(store.list("bob").unwrap().len(), 1);
        assert!(store.list("carol").unwrap().is_empty());
    }
}

#[test]
fn test_ids_are_unique_across_owners() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let mut ids = Vec::new();
        for owner in ["u1", "u2", "u3"] {
            for n in 0..5 {
                ids.push(store.create(owner, &format!("task {}", n), "").unwrap());
            }
        }
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total, "[{}]", backend.name);
    }
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_non_owner_update_is_refused_without_mutation() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "Private", "Notes").unwrap();
        let before = snapshot(&backend.db, &id);

        let outcome = store
            .update(&id, "u2", TaskChanges::new().with_completed(true))
            .unwrap();
        assert_eq!(outcome, Outcome::Unauthorized, "[{}]", backend.name);

        assert_eq!(snapshot(&backend.db, &id), before, "[{}] state unchanged", backend.name);
        assert!(!find(&store.list("u1").unwrap(), &id).completed);
    }
}

#[test]
fn test_non_owner_delete_is_refused_without_mutation() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "Keep me", "").unwrap();
        let before = snapshot(&backend.db, &id);

        assert_eq!(store.delete(&id, "u2").unwrap(), Outcome::Unauthorized);
        assert_eq!(snapshot(&backend.db, &id), before, "[{}]", backend.name);
        assert_eq!(store.list("u1").unwrap().len(), 1);
    }
}

#[test]
fn test_existence_is_checked_before_ownership() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        store.create("u1", "T", "").unwrap();

        assert_eq!(
            store
                .update("no-such-task", "u2", TaskChanges::new().with_title("x"))
                .unwrap(),
            Outcome::NotFound,
            "[{}]",
            backend.name
        );
        assert_eq!(store.delete("no-such-task", "u2").unwrap(), Outcome::NotFound);
        // Missing id with empty changes is still NotFound, not NoOp
        assert_eq!(
            store.update("no-such-task", "u1", TaskChanges::new()).unwrap(),
            Outcome::NotFound
        );
    }
}

#[test]
fn test_non_owner_with_empty_changes_is_unauthorized() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "T", "").unwrap();
        assert_eq!(
            store.update(&id, "u2", TaskChanges::new()).unwrap(),
            Outcome::Unauthorized,
            "[{}]",
            backend.name
        );
    }
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_empty_update_is_noop() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "T", "D").unwrap();
        let before = snapshot(&backend.db, &id);
        let listed_before = find(&store.list("u1").unwrap(), &id);

        assert_eq!(
            store.update(&id, "u1", TaskChanges::new()).unwrap(),
            Outcome::NoOp,
            "[{}]",
            backend.name
        );

        assert_eq!(snapshot(&backend.db, &id), before);
        let listed_after = find(&store.list("u1").unwrap(), &id);
        assert_eq!(listed_after.last_modified, listed_before.last_modified);
    }
}

#[test]
fn test_partial_update_refreshes_timestamp() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "Old", "Details").unwrap();
        let created = find(&store.list("u1").unwrap(), &id);

        assert_eq!(
            store
                .update(&id, "u1", TaskChanges::new().with_title("New"))
                .unwrap(),
            Outcome::Updated
        );

        let updated = find(&store.list("u1").unwrap(), &id);
        assert_eq!(updated.title, "New", "[{}]", backend.name);
        assert_eq!(updated.description, "Details");
        assert!(!updated.completed);
        assert_eq!(updated.owner_id, "u1");
        assert!(
            updated.last_modified > created.last_modified,
            "[{}] lastModified must move forward",
            backend.name
        );
    }
}

#[test]
fn test_update_all_fields() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "T", "D").unwrap();

        let changes = TaskChanges::new()
            .with_title("T2")
            .with_description("")
            .with_completed(true);
        assert_eq!(store.update(&id, "u1", changes).unwrap(), Outcome::Updated);

        let task = find(&store.list("u1").unwrap(), &id);
        assert_eq!(task.title, "T2", "[{}]", backend.name);
        assert_eq!(task.description, "");
        assert!(task.completed);
    }
}

#[test]
fn test_completed_can_be_reopened() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "T", "").unwrap();
        store
            .update(&id, "u1", TaskChanges::new().with_completed(true))
            .unwrap();
        store
            .update(&id, "u1", TaskChanges::new().with_completed(false))
            .unwrap();
        assert!(!find(&store.list("u1").unwrap(), &id).completed, "[{}]", backend.name);
    }
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_then_fetch_is_not_found() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "Gone soon", "").unwrap();
        let other = store.create("u1", "Stays", "").unwrap();

        assert_eq!(store.delete(&id, "u1").unwrap(), Outcome::Deleted);
        assert!(backend.db.get_by_id(TASKS_COLLECTION, &id).unwrap().is_none());

        assert_eq!(store.delete(&id, "u1").unwrap(), Outcome::NotFound, "[{}]", backend.name);
        assert_eq!(
            store
                .update(&id, "u1", TaskChanges::new().with_title("x"))
                .unwrap(),
            Outcome::NotFound
        );

        let remaining = store.list("u1").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, other);
    }
}

// ============================================================================
// Scenario from start to finish
// ============================================================================

#[test]
fn test_foreign_update_scenario() {
    for backend in backends() {
        let store = TaskStore::new(backend.db.clone());
        let id = store.create("u1", "Pay rent", "before the 5th").unwrap();

        assert_eq!(
            store
                .update(&id, "u2", TaskChanges::new().with_completed(true))
                .unwrap(),
            Outcome::Unauthorized
        );

        let stored = backend.db.get_by_id(TASKS_COLLECTION, &id).unwrap().unwrap();
        assert_eq!(
            stored.fields["completed"],
            serde_json::Value::Bool(false),
            "[{}]",
            backend.name
        );
    }
}
