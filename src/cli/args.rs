use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::{DB_ENV, DEFAULT_LOG_FILTER, LOG_ENV};
use crate::lifecycle::CommandStatus;
use crate::utils::time::parse_datetime;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database (defaults to ~/.obc-dispatch/dispatch.db)
    #[arg(long, global = true, env = DB_ENV)]
    pub db: Option<PathBuf>,

    /// Log filter, e.g. `info` or `obc_dispatch=debug`
    #[arg(long = "log", global = true, env = LOG_ENV, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the catalog of commands the OBC accepts
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
    /// Create and track dispatched commands
    Command {
        #[command(subcommand)]
        action: CommandCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Add a command definition to the catalog
    ///
    /// Parameters and formats are comma separated and pair up by position:
    ///   --params alt,lon --format int,float
    Add {
        /// Command name
        #[arg(short, long)]
        name: String,

        /// Comma separated parameter names
        #[arg(short, long)]
        params: Option<String>,

        /// Comma separated format descriptors, one per parameter
        #[arg(short, long)]
        format: Option<String>,

        /// Payload size in bytes
        #[arg(long)]
        data_size: i64,

        /// Total frame size in bytes
        #[arg(long)]
        total_size: i64,
    },
    /// Edit a catalog entry; the result is validated again
    Update {
        #[arg(required = true)]
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        params: Option<String>,

        #[arg(short, long)]
        format: Option<String>,

        /// Drop both params and format, making the command parameterless
        #[arg(long, conflicts_with_all = ["params", "format"])]
        clear_params: bool,

        #[arg(long)]
        data_size: Option<i64>,

        #[arg(long)]
        total_size: Option<i64>,
    },
    /// Show one catalog entry
    Show {
        #[arg(required = true)]
        id: i64,
    },
    /// List the catalog
    Ls,
    /// Remove a catalog entry no command refers to
    Rm {
        #[arg(required = true)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommandCommands {
    /// Dispatch a catalog command; it starts out PENDING
    Create {
        /// Catalog id of the command to dispatch
        #[arg(required = true)]
        command_type: i64,

        /// Comma separated parameter values
        #[arg(short, long)]
        params: Option<String>,
    },
    /// Show one command
    Show {
        #[arg(required = true)]
        id: i64,
    },
    /// List commands, newest first
    Ls {
        /// Only commands in this status
        #[arg(short, long, value_parser = parse_status)]
        status: Option<CommandStatus>,

        /// Only dispatches of this catalog id
        #[arg(short = 't', long = "type")]
        command_type: Option<i64>,

        /// Only commands created at or after this time
        #[arg(long, value_parser = parse_since)]
        since: Option<DateTime<Utc>>,

        /// Maximum number of results to show. Use 0 to show all commands.
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Move a command to a new status
    Transition {
        #[arg(required = true)]
        id: i64,

        /// PENDING, SENT, ACKNOWLEDGED, EXECUTED or FAILED
        #[arg(required = true, value_parser = parse_status)]
        status: CommandStatus,
    },
    /// Replace the parameter values of a command that has not finished
    Params {
        #[arg(required = true)]
        id: i64,

        /// New values; leave out to clear them
        params: Option<String>,
    },
    /// Count commands per status
    Stats,
}

impl Commands {
    /// Short name of the operation, used in call logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Commands::Catalog { action } => match action {
                CatalogCommands::Add { .. } => "catalog add",
                CatalogCommands::Update { .. } => "catalog update",
                CatalogCommands::Show { .. } => "catalog show",
                CatalogCommands::Ls => "catalog ls",
                CatalogCommands::Rm { .. } => "catalog rm",
            },
            Commands::Command { action } => match action {
                CommandCommands::Create { .. } => "command create",
                CommandCommands::Show { .. } => "command show",
                CommandCommands::Ls { .. } => "command ls",
                CommandCommands::Transition { .. } => "command transition",
                CommandCommands::Params { .. } => "command params",
                CommandCommands::Stats => "command stats",
            },
        }
    }
}

fn parse_status(s: &str) -> Result<CommandStatus, String> {
    s.parse().map_err(|e: crate::error::DispatchError| e.to_string())
}

fn parse_since(s: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(s).ok_or_else(|| format!("unrecognised date or time '{s}'"))
}
