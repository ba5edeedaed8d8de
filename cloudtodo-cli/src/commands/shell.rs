//! Interactive shell - numbered menus for login and task management

use anyhow::Result;
use cloudtodo_core::domain::email::INVALID_EMAIL_MESSAGE;
use cloudtodo_core::domain::is_valid_email;
use cloudtodo_core::{
    Account, EntryPoint, Error, LogEvent, LoggingService, TaskChanges, TodoContext,
};
use dialoguer::{Input, Password};

use super::{get_context, get_logger, log_event};
use crate::output;

fn prompt(label: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?)
}

/// Empty input means "leave unchanged"
fn optional(input: String) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// "yes"/"no" set the flag; anything else leaves it alone
fn parse_completed(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// Ask for an email until it passes the format check
fn prompt_email() -> Result<String> {
    loop {
        let email = prompt("Email")?;
        if is_valid_email(email.trim()) {
            return Ok(email);
        }
        output::error(INVALID_EMAIL_MESSAGE);
    }
}

fn prompt_password() -> Result<String> {
    Ok(Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?)
}

fn login(ctx: &TodoContext, logger: &Option<LoggingService>) -> Result<Option<Account>> {
    let email = prompt_email()?;
    let password = prompt_password()?;

    match ctx.auth.login(&email, &password) {
        Ok(account) => {
            output::success(&format!("Logged in as {}", account.email));
            log_event(
                logger,
                LogEvent::new("login").with_outcome("ok").with_account(&account.id),
            );
            Ok(Some(account))
        }
        Err(Error::NotFound(_)) => {
            output::error("User does not exist.");
            log_event(logger, LogEvent::new("login").with_outcome("not_found"));
            Ok(None)
        }
        Err(Error::Unauthorized(msg)) => {
            output::error(&msg);
            log_event(logger, LogEvent::new("login").with_outcome("unauthorized"));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn register(ctx: &TodoContext, logger: &Option<LoggingService>) -> Result<Option<Account>> {
    let email = prompt_email()?;
    let password = prompt_password()?;

    match ctx.auth.register(&email, &password) {
        Ok(account) => {
            output::success("Account created successfully!");
            log_event(
                logger,
                LogEvent::new("register").with_outcome("ok").with_account(&account.id),
            );
            Ok(Some(account))
        }
        Err(Error::AlreadyExists(_)) => {
            output::error("Email already registered. Please log in instead.");
            log_event(logger, LogEvent::new("register").with_outcome("already_exists"));
            Ok(None)
        }
        Err(Error::Validation(msg)) => {
            output::error(&msg);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Login/register loop; `None` when the user gives up
fn authenticate(ctx: &TodoContext, logger: &Option<LoggingService>) -> Result<Option<Account>> {
    loop {
        println!("\n1. Login");
        println!("2. Register");
        let choice = prompt("Select an option")?;

        let account = match choice.trim() {
            "1" => login(ctx, logger)?,
            "2" => register(ctx, logger)?,
            _ => {
                output::warning("Invalid selection.");
                None
            }
        };

        if account.is_some() {
            return Ok(account);
        }

        let retry = prompt("Do you want to try again or switch option? (yes/no)")?;
        if retry.trim().to_lowercase() != "yes" {
            return Ok(None);
        }
    }
}

fn create_task(
    ctx: &TodoContext,
    account: &Account,
    logger: &Option<LoggingService>,
) -> Result<()> {
    let title = prompt("Task Title")?;
    let description = prompt("Task Description")?;

    ctx.tasks.create(&account.id, &title, &description)?;
    output::success("Task created successfully!");
    log_event(
        logger,
        LogEvent::new("task_created").with_command("create").with_account(&account.id),
    );
    Ok(())
}

fn read_tasks(ctx: &TodoContext, account: &Account) -> Result<()> {
    let tasks = ctx.tasks.list(&account.id)?;
    output::print_tasks(&tasks);
    Ok(())
}

fn update_task(
    ctx: &TodoContext,
    account: &Account,
    logger: &Option<LoggingService>,
) -> Result<()> {
    let task_id = prompt("Task ID to update")?;
    let title = optional(prompt("New Title (leave blank to skip)")?);
    let description = optional(prompt("New Description (leave blank to skip)")?);
    let completed = parse_completed(&prompt("Completed? (yes/no/leave blank)")?);

    let changes = TaskChanges {
        title,
        description,
        completed,
    };
    let outcome = ctx.tasks.update(task_id.trim(), &account.id, changes)?;

    if outcome.is_applied() {
        output::success(outcome.message());
    } else {
        output::warning(outcome.message());
    }
    log_event(
        logger,
        LogEvent::new("task_update")
            .with_command("update")
            .with_outcome(outcome.as_str())
            .with_account(&account.id),
    );
    Ok(())
}

fn delete_task(
    ctx: &TodoContext,
    account: &Account,
    logger: &Option<LoggingService>,
) -> Result<()> {
    let task_id = prompt("Task ID to delete")?;
    let outcome = ctx.tasks.delete(task_id.trim(), &account.id)?;

    if outcome.is_applied() {
        output::success(outcome.message());
    } else {
        output::warning(outcome.message());
    }
    log_event(
        logger,
        LogEvent::new("task_delete")
            .with_command("delete")
            .with_outcome(outcome.as_str())
            .with_account(&account.id),
    );
    Ok(())
}

/// Run the interactive shell
pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Shell);
    log_event(&logger, LogEvent::new("shell_started"));

    println!("Welcome to Cloud To-Do App");

    let account = match authenticate(&ctx, &logger)? {
        Some(account) => account,
        None => {
            output::error("Authentication failed.");
            return Ok(());
        }
    };

    loop {
        println!("\nOptions:");
        println!("1. Create Task");
        println!("2. Read Tasks");
        println!("3. Update Task");
        println!("4. Delete Task");
        println!("5. Exit");

        let choice = prompt("Select an option")?;
        let result = match choice.trim() {
            "1" => create_task(&ctx, &account, &logger),
            "2" => read_tasks(&ctx, &account),
            "3" => update_task(&ctx, &account, &logger),
            "4" => delete_task(&ctx, &account, &logger),
            "5" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                output::warning("Invalid choice. Try again.");
                Ok(())
            }
        };

        // A failed operation ends that operation, not the session
        if let Err(e) = result {
            output::error(&format!("Operation failed: {:#}", e));
            log_event(
                &logger,
                LogEvent::new("operation_failed")
                    .with_command(choice.trim())
                    .with_error(e.to_string()),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completed() {
        assert_eq!(parse_completed("yes"), Some(true));
        assert_eq!(parse_completed("YES"), Some(true));
        assert_eq!(parse_completed("no"), Some(false));
        assert_eq!(parse_completed(""), None);
        assert_eq!(parse_completed("maybe"), None);
    }

    #[test]
    fn test_blank_means_unchanged() {
        assert_eq!(optional(String::new()), None);
        assert_eq!(optional("New".to_string()), Some("New".to_string()));
    }
}
