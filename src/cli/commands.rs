use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use colored::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::{Command, CommandFilter, Database, MainCommand};
use crate::lifecycle::CommandStatus;
use super::args::{CatalogCommands, CommandCommands, Commands};

const RULE: &str = "─────────────────────────────────────────────";

/// Run one CLI command against `db`.
///
/// Each call is logged twice: once with its arguments before it runs, once
/// with its outcome and duration afterwards. Logging never alters the result.
pub fn handle_command(command: Commands, db: &mut Database, json: bool) -> Result<()> {
    let operation = command.operation();
    let start = Instant::now();
    info!(operation, args = ?command, "request");

    let result = dispatch(command, db, json);

    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
    match &result {
        Ok(()) => info!(operation, outcome = "ok", duration_ms = %duration_ms, "response"),
        Err(e) => warn!(
            operation,
            outcome = "error",
            error = %e,
            duration_ms = %duration_ms,
            "response"
        ),
    }

    result
}

fn dispatch(command: Commands, db: &mut Database, json: bool) -> Result<()> {
    match command {
        Commands::Catalog { action } => handle_catalog(action, db, json),
        Commands::Command { action } => handle_dispatch(action, db, json),
    }
}

fn handle_catalog(action: CatalogCommands, db: &mut Database, json: bool) -> Result<()> {
    match action {
        CatalogCommands::Add { name, params, format, data_size, total_size } => {
            let candidate = MainCommand {
                id: None,
                name,
                params,
                format,
                data_size,
                total_size,
            };
            let main_command = db.add_main_command(&candidate)?;
            if json {
                print_json(&main_command)?;
            } else {
                println!("Main command added to catalog with ID: {}", main_command.id.unwrap_or(0));
            }
        }
        CatalogCommands::Update {
            id,
            name,
            params,
            format,
            clear_params,
            data_size,
            total_size,
        } => {
            let mut main_command = db.get_main_command(id)?;
            if let Some(name) = name {
                main_command.name = name;
            }
            if clear_params {
                main_command.params = None;
                main_command.format = None;
            }
            if params.is_some() {
                main_command.params = params;
            }
            if format.is_some() {
                main_command.format = format;
            }
            if let Some(data_size) = data_size {
                main_command.data_size = data_size;
            }
            if let Some(total_size) = total_size {
                main_command.total_size = total_size;
            }

            let main_command = db.update_main_command(&main_command)?;
            if json {
                print_json(&main_command)?;
            } else {
                println!("Main command {} updated", id);
            }
        }
        CatalogCommands::Show { id } => {
            let main_command = db.get_main_command(id)?;
            if json {
                print_json(&main_command)?;
            } else {
                print_main_commands(&[main_command]);
            }
        }
        CatalogCommands::Ls => {
            let main_commands = db.list_main_commands()?;
            if json {
                print_json(&main_commands)?;
            } else {
                print_main_commands(&main_commands);
            }
        }
        CatalogCommands::Rm { id } => {
            db.delete_main_command(id)?;
            println!("Main command {} removed", id);
        }
    }
    Ok(())
}

fn handle_dispatch(action: CommandCommands, db: &mut Database, json: bool) -> Result<()> {
    match action {
        CommandCommands::Create { command_type, params } => {
            let command = db.create_command(command_type, params)?;
            if json {
                print_json(&command)?;
            } else {
                println!(
                    "Command created with ID: {} ({})",
                    command.id.unwrap_or(0),
                    status_label(command.status)
                );
            }
        }
        CommandCommands::Show { id } => {
            let command = db.get_command(id)?;
            if json {
                print_json(&command)?;
            } else {
                print_commands(&[command]);
            }
        }
        CommandCommands::Ls { status, command_type, since, limit } => {
            let filter = CommandFilter {
                status,
                command_type,
                since,
                limit,
            };
            let commands = db.list_commands(&filter)?;
            if json {
                print_json(&commands)?;
            } else {
                print_commands(&commands);
            }
        }
        CommandCommands::Transition { id, status } => {
            let command = db.transition_command(id, status)?;
            if json {
                print_json(&command)?;
            } else {
                println!("Command {} is now {}", id, status_label(command.status));
            }
        }
        CommandCommands::Params { id, params } => {
            let command = db.update_command_params(id, params)?;
            if json {
                print_json(&command)?;
            } else {
                println!("Command {} params updated", id);
            }
        }
        CommandCommands::Stats => {
            let counts = db.count_commands_by_status()?;
            if json {
                print_json(&counts)?;
                return Ok(());
            }

            println!("\nCommands per status:");
            println!("{}", RULE);
            for (status, count) in counts {
                println!("{}: {} command{}", status_label(status), count, if count == 1 { "" } else { "s" });
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_label(status: CommandStatus) -> ColoredString {
    match status {
        CommandStatus::Pending => status.as_str().yellow(),
        CommandStatus::Sent | CommandStatus::Acknowledged => status.as_str().cyan(),
        CommandStatus::Executed => status.as_str().green().bold(),
        CommandStatus::Failed => status.as_str().red().bold(),
    }
}

fn print_main_commands(main_commands: &[MainCommand]) {
    if main_commands.is_empty() {
        println!("The catalog is empty.");
        return;
    }

    println!("\n{} catalog entr{}:", main_commands.len(), if main_commands.len() == 1 { "y" } else { "ies" });
    println!("{}", RULE);

    for main_command in main_commands {
        println!("({}) {}", main_command.id.unwrap_or(0), main_command.name.bold());
        match (&main_command.params, &main_command.format) {
            (Some(params), Some(format)) if !params.is_empty() => {
                println!("    Params: {}", params);
                println!("    Format: {}", format);
            }
            _ => println!("    No parameters"),
        }
        println!("    Data size: {} / Total size: {}", main_command.data_size, main_command.total_size);
        println!("{}", RULE);
    }
}

fn print_commands(commands: &[Command]) {
    if commands.is_empty() {
        println!("No matching commands found.");
        return;
    }

    println!("\nFound {} matching commands:", commands.len());
    println!("{}", RULE);

    for cmd in commands {
        let created = cmd.created_on.with_timezone(&Local);
        println!("({}) [{}] type {} {}",
            cmd.id.unwrap_or(0),
            created.format("%Y-%m-%d %H:%M:%S"),
            cmd.command_type,
            status_label(cmd.status)
        );

        if let Some(params) = &cmd.params {
            println!("    Params: {}", params);
        }

        let updated = cmd.updated_on.with_timezone(&Local);
        println!("    Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
        println!("{}", RULE);
    }
}
