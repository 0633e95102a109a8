use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// Where a dispatched command is in its life.
///
/// `Pending -> Sent -> Acknowledged -> Executed` is the success path. Any
/// non-terminal status may drop to `Failed` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    #[default]
    Pending,
    Sent,
    Acknowledged,
    Executed,
    Failed,
}

impl CommandStatus {
    pub const ALL: [CommandStatus; 5] = [
        CommandStatus::Pending,
        CommandStatus::Sent,
        CommandStatus::Acknowledged,
        CommandStatus::Executed,
        CommandStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Pending => "PENDING",
            CommandStatus::Sent => "SENT",
            CommandStatus::Acknowledged => "ACKNOWLEDGED",
            CommandStatus::Executed => "EXECUTED",
            CommandStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CommandStatus::Executed | CommandStatus::Failed)
    }

    /// The next status on the success path, if any.
    pub fn successor(self) -> Option<CommandStatus> {
        match self {
            CommandStatus::Pending => Some(CommandStatus::Sent),
            CommandStatus::Sent => Some(CommandStatus::Acknowledged),
            CommandStatus::Acknowledged => Some(CommandStatus::Executed),
            CommandStatus::Executed | CommandStatus::Failed => None,
        }
    }

    pub fn can_transition_to(self, next: CommandStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == CommandStatus::Failed || self.successor() == Some(next)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandStatus {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DispatchError::UnknownStatus(s.to_string()))
    }
}
