use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use super::models::{Command, CommandFilter, MainCommand};
use crate::catalog;
use crate::error::{DispatchError, Result};
use crate::lifecycle::CommandStatus;
use crate::utils::time;

const MAIN_COMMAND_COLUMNS: &str = "id, name, params, format, data_size, total_size";
const COMMAND_COLUMNS: &str = "id, command_type, status, params, created_on, updated_on";

/// SQLite backed record store for catalog entries and dispatched commands.
///
/// Every write runs in its own transaction, so a rejected operation never
/// leaves a partial row behind.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let db = Database {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Database {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        db.init()?;
        Ok(db)
    }

    /// Location of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(&self) -> Result<()> {
        // Foreign keys are off by default and are a per-connection setting.
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS main_commands (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                params TEXT,
                format TEXT,
                data_size INTEGER NOT NULL,
                total_size INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS commands (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                command_type INTEGER NOT NULL REFERENCES main_commands(id),
                status TEXT NOT NULL DEFAULT 'PENDING',
                params TEXT,
                created_on TEXT NOT NULL,
                updated_on TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_commands_command_type ON commands(command_type)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_commands_status ON commands(status)",
            [],
        )?;

        Ok(())
    }

    /// Validate and insert a catalog entry. Any `id` on the candidate is
    /// ignored; the stored record carries the assigned one.
    pub fn add_main_command(&mut self, candidate: &MainCommand) -> Result<MainCommand> {
        let mut main_command = reject_invalid(candidate.clone())?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO main_commands (name, params, format, data_size, total_size)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                main_command.name,
                main_command.params,
                main_command.format,
                main_command.data_size,
                main_command.total_size,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        main_command.id = Some(id);
        info!(id, name = %main_command.name, "main command added to catalog");
        Ok(main_command)
    }

    pub fn get_main_command(&self, id: i64) -> Result<MainCommand> {
        find_main_command(&self.conn, id)?.ok_or(DispatchError::NotFound {
            entity: "main command",
            id,
        })
    }

    /// Re-validate and overwrite an existing catalog entry.
    pub fn update_main_command(&mut self, main_command: &MainCommand) -> Result<MainCommand> {
        let id = main_command.id.ok_or(DispatchError::MissingId)?;
        let main_command = reject_invalid(main_command.clone())?;

        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE main_commands
             SET name = ?1,
                 params = ?2,
                 format = ?3,
                 data_size = ?4,
                 total_size = ?5
             WHERE id = ?6",
            params![
                main_command.name,
                main_command.params,
                main_command.format,
                main_command.data_size,
                main_command.total_size,
                id,
            ],
        )?;
        if rows == 0 {
            return Err(DispatchError::NotFound {
                entity: "main command",
                id,
            });
        }
        tx.commit()?;

        info!(id, name = %main_command.name, "main command updated");
        Ok(main_command)
    }

    /// Remove a catalog entry that no command references.
    pub fn delete_main_command(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;

        let references: i64 = tx.query_row(
            "SELECT COUNT(*) FROM commands WHERE command_type = ?1",
            [id],
            |row| row.get(0),
        )?;
        if references > 0 {
            warn!(id, references, "refused to delete referenced main command");
            return Err(DispatchError::MainCommandInUse { id, references });
        }

        let rows = tx.execute("DELETE FROM main_commands WHERE id = ?1", [id])?;
        if rows == 0 {
            return Err(DispatchError::NotFound {
                entity: "main command",
                id,
            });
        }
        tx.commit()?;

        info!(id, "main command deleted");
        Ok(())
    }

    pub fn list_main_commands(&self) -> Result<Vec<MainCommand>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MAIN_COMMAND_COLUMNS} FROM main_commands ORDER BY id ASC"
        ))?;

        let main_commands = stmt
            .query_map([], main_command_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(main_commands)
    }

    /// Record a new dispatch of `command_type` in `PENDING`.
    ///
    /// The catalog lookup and the insert share one transaction, so the
    /// reference cannot go stale in between.
    pub fn create_command(&mut self, command_type: i64, params: Option<String>) -> Result<Command> {
        let tx = self.conn.transaction()?;

        let known = tx
            .query_row(
                "SELECT 1 FROM main_commands WHERE id = ?1",
                [command_type],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !known {
            warn!(command_type, "rejected command with unknown command type");
            return Err(DispatchError::UnknownCommandType(command_type));
        }

        let mut command = Command::new(command_type, params);
        tx.execute(
            "INSERT INTO commands (command_type, status, params, created_on, updated_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                command.command_type,
                command.status.as_str(),
                command.params,
                time::to_storage(&command.created_on),
                time::to_storage(&command.updated_on),
            ],
        )?;
        let id = tx.last_insert_rowid();
        command.id = Some(id);
        tx.commit()?;

        info!(
            id,
            command_type,
            status = %command.status,
            "command created"
        );
        Ok(command)
    }

    pub fn get_command(&self, id: i64) -> Result<Command> {
        find_command(&self.conn, id)?.ok_or(DispatchError::NotFound {
            entity: "command",
            id,
        })
    }

    /// Move command `id` to `status` along an allowed lifecycle edge.
    pub fn transition_command(&mut self, id: i64, status: CommandStatus) -> Result<Command> {
        let tx = self.conn.transaction()?;

        let mut command = find_command(&tx, id)?.ok_or(DispatchError::NotFound {
            entity: "command",
            id,
        })?;
        let previous = command.status;
        command.transition(status)?;

        tx.execute(
            "UPDATE commands SET status = ?1, updated_on = ?2 WHERE id = ?3",
            params![
                command.status.as_str(),
                time::to_storage(&command.updated_on),
                id,
            ],
        )?;
        tx.commit()?;

        info!(id, from = %previous, to = %command.status, "command status changed");
        Ok(command)
    }

    /// Replace the parameter values of a command that is not yet terminal.
    pub fn update_command_params(&mut self, id: i64, params: Option<String>) -> Result<Command> {
        let tx = self.conn.transaction()?;

        let mut command = find_command(&tx, id)?.ok_or(DispatchError::NotFound {
            entity: "command",
            id,
        })?;
        command.update_params(params)?;

        tx.execute(
            "UPDATE commands SET params = ?1, updated_on = ?2 WHERE id = ?3",
            params![command.params, time::to_storage(&command.updated_on), id],
        )?;
        tx.commit()?;

        info!(id, "command params updated");
        Ok(command)
    }

    /// Commands matching `filter`, newest first.
    pub fn list_commands(&self, filter: &CommandFilter) -> Result<Vec<Command>> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(status) = filter.status {
            values.push(Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(command_type) = filter.command_type {
            values.push(Value::Integer(command_type));
            clauses.push(format!("command_type = ?{}", values.len()));
        }
        if let Some(since) = filter.since {
            values.push(Value::Text(time::to_storage(&since)));
            clauses.push(format!("created_on >= ?{}", values.len()));
        }

        let mut query = format!("SELECT {COMMAND_COLUMNS} FROM commands");
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY created_on DESC, id DESC");
        if filter.limit > 0 {
            values.push(Value::Integer(sql_limit(filter.limit)));
            query.push_str(&format!(" LIMIT ?{}", values.len()));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut commands = Vec::new();

        while let Some(row) = rows.next()? {
            commands.push(command_from_row(row)?);
        }

        Ok(commands)
    }

    /// How many commands sit in each status, statuses in lifecycle order.
    /// Statuses with no commands are reported as zero.
    pub fn count_commands_by_status(&self) -> Result<Vec<(CommandStatus, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM commands GROUP BY status")?;
        let mut rows = stmt.query([])?;

        let mut counts: Vec<(CommandStatus, i64)> =
            CommandStatus::ALL.into_iter().map(|s| (s, 0)).collect();

        while let Some(row) = rows.next()? {
            let status: CommandStatus = row.get::<_, String>(0)?.parse()?;
            let count: i64 = row.get(1)?;
            if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
                entry.1 = count;
            }
        }

        Ok(counts)
    }
}

/// SQLite treats a negative LIMIT as unlimited, so clamp instead of wrapping.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn reject_invalid(candidate: MainCommand) -> Result<MainCommand> {
    catalog::validate(candidate).inspect_err(|err| {
        warn!(error = %err, "rejected main command definition");
    })
}

fn find_main_command(conn: &Connection, id: i64) -> Result<Option<MainCommand>> {
    let main_command = conn
        .query_row(
            &format!("SELECT {MAIN_COMMAND_COLUMNS} FROM main_commands WHERE id = ?1"),
            [id],
            main_command_from_row,
        )
        .optional()?;
    Ok(main_command)
}

fn find_command(conn: &Connection, id: i64) -> Result<Option<Command>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMMAND_COLUMNS} FROM commands WHERE id = ?1"
    ))?;
    let mut rows = stmt.query([id])?;

    match rows.next()? {
        Some(row) => Ok(Some(command_from_row(row)?)),
        None => Ok(None),
    }
}

fn main_command_from_row(row: &Row<'_>) -> rusqlite::Result<MainCommand> {
    Ok(MainCommand {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        params: row.get(2)?,
        format: row.get(3)?,
        data_size: row.get(4)?,
        total_size: row.get(5)?,
    })
}

fn command_from_row(row: &Row<'_>) -> Result<Command> {
    Ok(Command {
        id: Some(row.get(0)?),
        command_type: row.get(1)?,
        status: row.get::<_, String>(2)?.parse()?,
        params: row.get(3)?,
        created_on: time::from_storage(&row.get::<_, String>(4)?)?,
        updated_on: time::from_storage(&row.get::<_, String>(5)?)?,
    })
}
