//! Task commands - add, list, update and delete without the shell

use anyhow::{bail, Result};
use cloudtodo_core::{EntryPoint, LogEvent, Outcome, TaskChanges};
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event, resolve_account};
use crate::output;

/// Print an outcome and fail on refusals so the exit code reflects them
fn report(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Updated | Outcome::Deleted => {
            output::success(outcome.message());
            Ok(())
        }
        Outcome::NoOp => {
            output::warning(outcome.message());
            Ok(())
        }
        Outcome::NotFound | Outcome::Unauthorized => bail!(outcome.message()),
    }
}

pub fn add(email: &str, title: &str, description: &str) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Cli);
    let account = resolve_account(&ctx, email)?;

    let id = ctx.tasks.create(&account.id, title, description)?;
    log_event(
        &logger,
        LogEvent::new("task_created").with_command("add").with_account(&account.id),
    );

    output::success("Task created successfully!");
    output::info(&format!("ID: {}", id));
    Ok(())
}

pub fn list(email: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = resolve_account(&ctx, email)?;
    let tasks = ctx.tasks.list(&account.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        output::print_task_table(&tasks);
    }
    Ok(())
}

pub fn update(
    id: &str,
    email: &str,
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Cli);
    let account = resolve_account(&ctx, email)?;

    let changes = TaskChanges {
        title,
        description,
        completed,
    };
    let outcome = ctx.tasks.update(id, &account.id, changes)?;
    log_event(
        &logger,
        LogEvent::new("task_update")
            .with_command("update")
            .with_outcome(outcome.as_str())
            .with_account(&account.id),
    );

    report(outcome)
}

pub fn delete(id: &str, email: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Cli);
    let account = resolve_account(&ctx, email)?;

    if !force
        && !Confirm::new()
            .with_prompt(format!("Delete task {}?", id))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = ctx.tasks.delete(id, &account.id)?;
    log_event(
        &logger,
        LogEvent::new("task_delete")
            .with_command("delete")
            .with_outcome(outcome.as_str())
            .with_account(&account.id),
    );

    report(outcome)
}
