use super::{Command, CommandError};
use crate::path::PathExpander;
use std::env;
use std::io::Write;

#[derive(Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Result<(), CommandError> {
        let path_str = args.first().ok_or_else(|| {
            CommandError::InvalidArguments("Expected argument to \"cd\"".into())
        })?;

        let expanded_path = self
            .path_expander
            .expand(path_str)
            .map_err(|e| CommandError::InvalidArguments(format!("cd: {}", e)))?;

        env::set_current_dir(&expanded_path).map_err(CommandError::failed("cd"))
    }
}
