//! Output formatting utilities

use cloudtodo_core::Task;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print a task list the way the interactive shell shows it
pub fn print_tasks(tasks: &[Task]) {
    println!("\n{}", "--- Your Tasks ---".bold());
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    for task in tasks {
        println!(
            "ID: {}\nTitle: {}\nDescription: {}\nCompleted: {}\n",
            task.id, task.title, task.description, task.completed
        );
    }
}

/// Print a task list as a table
pub fn print_task_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Title", "Description", "Done", "Last Modified"]);
    for task in tasks {
        table.add_row(vec![
            task.id.clone(),
            task.title.clone(),
            task.description.clone(),
            if task.completed { "✓".to_string() } else { String::new() },
            task.last_modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    println!("{}", table);
}
