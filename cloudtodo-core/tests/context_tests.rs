//! End-to-end tests through TodoContext with a real DuckDB file
//!
//! Run with: cargo test --test context_tests -- --nocapture

use std::path::Path;

use tempfile::TempDir;

use cloudtodo_core::config::{Config, Credentials};
use cloudtodo_core::{Error, Outcome, TaskChanges, TodoContext};

// ============================================================================
// Test Helpers
// ============================================================================

fn write_credentials(dir: &Path, project_id: &str) -> Credentials {
    let path = dir.join("credentials.json");
    std::fs::write(
        &path,
        format!(r#"{{"project_id": "{}", "type": "service_account"}}"#, project_id),
    )
    .unwrap();
    Credentials::load(&path).unwrap()
}

fn open(dir: &TempDir) -> TodoContext {
    let credentials = write_credentials(dir.path(), "todo-test");
    TodoContext::new(dir.path(), credentials).expect("context")
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_database_file_follows_project_id() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);
    assert_eq!(
        ctx.store.db_path(),
        Some(dir.path().join("todo-test.duckdb").as_path())
    );
}

#[test]
fn test_register_create_and_reopen() {
    let dir = TempDir::new().unwrap();

    let (account_id, task_id) = {
        let ctx = open(&dir);
        let account = ctx.auth.register("dana@example.com", "pa55word").unwrap();
        let task_id = ctx.tasks.create(&account.id, "Water plants", "Balcony").unwrap();
        (account.id, task_id)
    };

    let ctx = open(&dir);
    let account = ctx.auth.login("dana@example.com", "ignored").unwrap();
    assert_eq!(account.id, account_id);

    let tasks = ctx.tasks.list(&account.id).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].title, "Water plants");
}

#[test]
fn test_two_accounts_cannot_touch_each_other() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);

    let alice = ctx.auth.register("alice@example.com", "alice-pw").unwrap();
    let bob = ctx.auth.register("bob@example.com", "bob-pw-1").unwrap();
    let task = ctx.tasks.create(&alice.id, "Alice only", "").unwrap();

    assert!(ctx.tasks.list(&bob.id).unwrap().is_empty());
    assert_eq!(
        ctx.tasks
            .update(&task, &bob.id, TaskChanges::new().with_title("hijacked"))
            .unwrap(),
        Outcome::Unauthorized
    );
    assert_eq!(ctx.tasks.delete(&task, &bob.id).unwrap(), Outcome::Unauthorized);
    assert_eq!(ctx.tasks.list(&alice.id).unwrap()[0].title, "Alice only");
}

#[test]
fn test_duplicate_registration() {
    let dir = TempDir::new().unwrap();
    let ctx = open(&dir);

    ctx.auth.register("erin@example.com", "first-pw").unwrap();
    let err = ctx.auth.register("erin@example.com", "second-pw").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn test_settings_enable_concealment() {
    let dir = TempDir::new().unwrap();
    Config {
        verify_password: false,
        conceal_foreign_tasks: true,
    }
    .save(dir.path())
    .unwrap();

    let ctx = open(&dir);
    let owner = ctx.auth.register("frank@example.com", "frank-pw").unwrap();
    let other = ctx.auth.register("gina@example.com", "gina-pw").unwrap();
    let task = ctx.tasks.create(&owner.id, "Secret", "").unwrap();

    assert_eq!(ctx.tasks.delete(&task, &other.id).unwrap(), Outcome::NotFound);
    assert_eq!(ctx.tasks.list(&owner.id).unwrap().len(), 1);
}
