use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Cli;

pub const DB_ENV: &str = "OBC_DISPATCH_DB";
pub const LOG_ENV: &str = "OBC_DISPATCH_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

const DATA_DIR: &str = ".obc-dispatch";
const DB_FILE: &str = "dispatch.db";

/// Runtime settings, resolved from flags, then environment, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            db_path: cli.db.clone().unwrap_or_else(default_db_path),
            log_filter: cli.log_filter.clone(),
        }
    }

    /// Make sure the directory holding the database exists.
    pub fn prepare(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: default_db_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// `~/.obc-dispatch/dispatch.db`, or `./dispatch.db` without a home directory.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|mut path| {
            path.push(DATA_DIR);
            path.push(DB_FILE);
            path
        })
        .unwrap_or_else(|| PathBuf::from(DB_FILE))
}
