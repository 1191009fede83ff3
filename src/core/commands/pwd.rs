use super::{Command, CommandError};
use std::env;
use std::io::Write;

#[derive(Clone, Default)]
pub struct PwdCommand;

impl PwdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for PwdCommand {
    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let cwd = env::current_dir().map_err(CommandError::failed("pwd"))?;
        writeln!(out, "{}", cwd.display()).map_err(CommandError::failed("pwd"))
    }
}
