use tracing::warn;

use crate::db::models::Command;
use crate::error::{DispatchError, Result};
use crate::utils::time;

use super::CommandStatus;

impl Command {
    /// A fresh, not yet stored dispatch of catalog entry `command_type`.
    ///
    /// Whether `command_type` exists is checked by the store when the
    /// command is inserted.
    pub fn new(command_type: i64, params: Option<String>) -> Self {
        let now = time::now();
        Command {
            id: None,
            command_type,
            status: CommandStatus::Pending,
            params,
            created_on: now,
            updated_on: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to `next`, refreshing `updated_on`.
    ///
    /// On error the command is left exactly as it was.
    pub fn transition(&mut self, next: CommandStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            warn!(
                id = self.id,
                from = %self.status,
                to = %next,
                "rejected command status transition"
            );
            return Err(DispatchError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.touch();
        Ok(())
    }

    /// Replace the parameter values. Only allowed before a terminal status.
    pub fn update_params(&mut self, params: Option<String>) -> Result<()> {
        if self.is_terminal() {
            warn!(id = self.id, status = %self.status, "rejected params update");
            return Err(DispatchError::ImmutableRecord {
                id: self.id,
                status: self.status,
            });
        }

        self.params = params;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_on = time::advance(self.updated_on);
    }
}
