use super::{Command, CommandError};
use crate::core::env::EnvVarManager;
use std::io::Write;

/// Prints each argument followed by one space, then a newline.
///
/// With expansion on, `$NAME` prints the variable's value, and prints
/// nothing at all (not even the space) when `NAME` is unset.
#[derive(Clone)]
pub struct EchoCommand {
    expand_vars: bool,
    env_vars: EnvVarManager,
}

impl EchoCommand {
    pub fn new(expand_vars: bool) -> Self {
        Self {
            expand_vars,
            env_vars: EnvVarManager::new(),
        }
    }

    fn render(&self, args: &[String]) -> String {
        let mut line = String::new();
        for arg in args {
            let word = if self.expand_vars {
                match self.env_vars.expand_token(arg) {
                    Some(Some(value)) => value,
                    Some(None) => continue,
                    None => arg.clone(),
                }
            } else {
                arg.clone()
            };
            line.push_str(&word);
            line.push(' ');
        }
        line.push('\n');
        line
    }
}

impl Command for EchoCommand {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        out.write_all(self.render(args).as_bytes())
            .map_err(CommandError::failed("echo"))
    }
}
