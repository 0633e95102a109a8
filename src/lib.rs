//! Ground-station command catalog and dispatch tracker.
//!
//! [`catalog`] validates the command definitions the onboard computer
//! accepts, [`lifecycle`] owns the status rules of each dispatched command,
//! and [`db`] persists both in SQLite.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod utils;
pub mod version;

pub use db::{Command, Database, MainCommand};
pub use error::{DispatchError, Result};
pub use lifecycle::CommandStatus;
pub use version::VERSION;
