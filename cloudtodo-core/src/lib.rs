//! Cloud To-Do Core - task management on a document database
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Task, Account, outcomes, email validation, errors
//! - **ports**: Trait definitions for external services (DocumentDatabase, IdentityProvider)
//! - **services**: TaskStore, AuthService, logging, migrations
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::DuckDbStore;
use config::{Config, Credentials};
use services::{AuthService, TaskStore};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Account, Outcome, Task, TaskChanges};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for to-do operations
///
/// Owns the database handle and hands it to the services explicitly; there
/// is no process-wide client.
pub struct TodoContext {
    pub config: Config,
    pub credentials: Credentials,
    pub store: Arc<DuckDbStore>,
    pub tasks: TaskStore,
    pub auth: AuthService,
}

impl TodoContext {
    /// Open the database named by `credentials` and wire up the services
    pub fn new(data_dir: &Path, credentials: Credentials) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = credentials.database_file(data_dir);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Arc::new(DuckDbStore::new(&db_path)?);
        store.ensure_schema()?;

        let tasks =
            TaskStore::new(store.clone()).with_concealment(config.conceal_foreign_tasks);
        let auth =
            AuthService::new(store.clone()).with_password_verification(config.verify_password);

        Ok(Self {
            config,
            credentials,
            store,
            tasks,
            auth,
        })
    }
}
