//! Cloud To-Do CLI - tasks on a document database from your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, logs, shell, task};

/// Cloud To-Do - run without a subcommand for the interactive shell
#[derive(Parser)]
#[command(name = "todo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Account email
        #[arg(long, env = "CLOUDTODO_EMAIL")]
        email: String,
    },

    /// Create a task
    Add {
        /// Account email
        #[arg(long, env = "CLOUDTODO_EMAIL")]
        email: String,
        /// Task title
        #[arg(long)]
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List your tasks
    List {
        /// Account email
        #[arg(long, env = "CLOUDTODO_EMAIL")]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        id: String,
        /// Account email
        #[arg(long, env = "CLOUDTODO_EMAIL")]
        email: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Mark completed (yes/no)
        #[arg(long, value_parser = ["yes", "no"])]
        completed: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Account email
        #[arg(long, env = "CLOUDTODO_EMAIL")]
        email: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    // `.env` first, so clap's env fallbacks and the credentials lookup see it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => shell::run(),
        Some(Commands::Register { email }) => account::register(&email),
        Some(Commands::Add { email, title, description }) => {
            task::add(&email, &title, &description)
        }
        Some(Commands::List { email, json }) => task::list(&email, json),
        Some(Commands::Update { id, email, title, description, completed }) => {
            let completed = completed.map(|c| c == "yes");
            task::update(&id, &email, title, description, completed)
        }
        Some(Commands::Delete { id, email, force }) => task::delete(&id, &email, force),
        Some(Commands::Logs { command }) => logs::run(command),
    }
}
