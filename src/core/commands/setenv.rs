use super::{Command, CommandError};
use crate::core::env::EnvVarManager;
use std::io::Write;

#[derive(Clone, Default)]
pub struct SetenvCommand {
    env_vars: EnvVarManager,
}

impl SetenvCommand {
    pub fn new() -> Self {
        Self {
            env_vars: EnvVarManager::new(),
        }
    }
}

impl Command for SetenvCommand {
    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Result<(), CommandError> {
        match args {
            [name, value, ..] => Ok(self.env_vars.set(name, value)?),
            _ => Err(CommandError::InvalidArguments(
                "Expected two arguments for \"setenv\"".into(),
            )),
        }
    }
}
