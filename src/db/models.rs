use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::lifecycle::CommandStatus;

/// A command the OBC accepts, as listed in the command catalog.
///
/// `params` and `format` are comma separated lists (`"alt,lon"` /
/// `"int,float"`) that pair up positionally. See [`crate::catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCommand {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub data_size: i64,
    pub total_size: i64,
}

impl MainCommand {
    pub fn new(name: impl Into<String>, data_size: i64, total_size: i64) -> Self {
        MainCommand {
            id: None,
            name: name.into(),
            params: None,
            format: None,
            data_size,
            total_size,
        }
    }

    pub fn with_params(mut self, params: impl Into<String>, format: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self.format = Some(format.into());
        self
    }
}

/// One dispatch of a [`MainCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: Option<i64>,
    pub command_type: i64,
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Selection used when listing commands. Empty filter lists everything.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    pub status: Option<CommandStatus>,
    pub command_type: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    /// 0 means no limit.
    pub limit: usize,
}
