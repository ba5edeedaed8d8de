//! Account command - register without the shell

use anyhow::Result;
use cloudtodo_core::{EntryPoint, LogEvent};
use dialoguer::Password;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn register(email: &str) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Cli);

    let secret = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let account = ctx.auth.register(email, &secret)?;
    log_event(
        &logger,
        LogEvent::new("register")
            .with_command("register")
            .with_outcome("ok")
            .with_account(&account.id),
    );

    output::success("Account created successfully!");
    output::info(&format!("Account ID: {}", account.id));
    Ok(())
}
