use super::{Command, CommandError};
use crate::core::env::EnvVarManager;
use std::io::Write;

#[derive(Clone, Default)]
pub struct EnvCommand {
    env_vars: EnvVarManager,
}

impl EnvCommand {
    pub fn new() -> Self {
        Self {
            env_vars: EnvVarManager::new(),
        }
    }
}

impl Command for EnvCommand {
    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        for (key, value) in self.env_vars.entries() {
            writeln!(out, "{}={}", key, value).map_err(CommandError::failed("env"))?;
        }
        Ok(())
    }
}
