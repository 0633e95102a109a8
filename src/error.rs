use thiserror::Error;

use crate::lifecycle::CommandStatus;

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Everything the catalog, the lifecycle rules and the store can reject.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("both params and format must be provided together or both be None")]
    InconsistentDefinition,

    #[error("params and format must have the same number of values (params: {params}, format: {format})")]
    ParamFormatMismatch { params: usize, format: usize },

    #[error("unknown command type: no main command with id {0}")]
    UnknownCommandType(i64),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: CommandStatus,
        to: CommandStatus,
    },

    #[error("command{} is {status} and can no longer be modified", id_label(.id))]
    ImmutableRecord {
        id: Option<i64>,
        status: CommandStatus,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("main command {id} is still referenced by {references} command(s)")]
    MainCommandInUse { id: i64, references: i64 },

    #[error("record has no id; it must be inserted before it can be updated")]
    MissingId,

    #[error("unknown command status '{0}'")]
    UnknownStatus(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("stored timestamp is malformed: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl DispatchError {
    /// True when the caller can fix the failure by correcting its input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Timestamp(_))
    }
}

fn id_label(id: &Option<i64>) -> String {
    id.map(|id| format!(" {id}")).unwrap_or_default()
}
