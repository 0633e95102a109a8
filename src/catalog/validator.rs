use tracing::debug;

use crate::db::models::MainCommand;
use crate::error::{DispatchError, Result};
use crate::utils::params::count_values;

/// Check that `params` and `format` describe the same parameters.
///
/// Both absent is a parameterless command. Both present must split into the
/// same number of values, where `""` counts as zero values. The strings are
/// never rewritten.
pub fn validate_definition(params: Option<&str>, format: Option<&str>) -> Result<()> {
    match (params, format) {
        (None, None) => Ok(()),
        (Some(params), Some(format)) => {
            let params = count_values(params);
            let format = count_values(format);
            if params != format {
                return Err(DispatchError::ParamFormatMismatch { params, format });
            }
            Ok(())
        }
        _ => Err(DispatchError::InconsistentDefinition),
    }
}

/// Validate a catalog candidate, handing it back unchanged when it is sound.
pub fn validate(candidate: MainCommand) -> Result<MainCommand> {
    validate_definition(candidate.params.as_deref(), candidate.format.as_deref())?;
    debug!(name = %candidate.name, "main command definition is consistent");
    Ok(candidate)
}

impl MainCommand {
    pub fn validate(self) -> Result<Self> {
        validate(self)
    }

    /// Number of parameters this command declares.
    pub fn param_count(&self) -> usize {
        self.params.as_deref().map(count_values).unwrap_or(0)
    }
}
