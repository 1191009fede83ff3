use super::{Command, CommandError};
use std::io::Write;

#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let _ = out.flush();
        let _ = std::io::stdout().flush();
        log::debug!("exit");
        std::process::exit(0);
    }
}
