//! CLI command implementations

pub mod account;
pub mod logs;
pub mod shell;
pub mod task;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cloudtodo_core::config::Credentials;
use cloudtodo_core::{Account, EntryPoint, LogEvent, LoggingService, TodoContext};
use dialoguer::Password;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CLOUDTODO_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".cloudtodo"))
}

/// Load credentials and open the to-do context
///
/// Missing credentials are fatal; this runs before any prompt is shown.
pub fn get_context() -> Result<TodoContext> {
    let credentials = Credentials::from_env().context("Failed to load service credentials")?;

    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    TodoContext::new(&data_dir, credentials).context("Failed to initialize to-do context")
}

/// Resolve the account for a non-interactive command
///
/// The password is only asked for when the settings turn verification on.
pub fn resolve_account(ctx: &TodoContext, email: &str) -> Result<Account> {
    let secret = if ctx.auth.verifies_password() {
        Password::new().with_prompt("Password").interact()?
    } else {
        String::new()
    };

    Ok(ctx.auth.login(email, &secret)?)
}
