use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod echo;
mod env;
mod exit;
mod pwd;
mod setenv;

pub use cd::CdCommand;
pub use echo::EchoCommand;
pub use env::EnvCommand;
pub use exit::ExitCommand;
pub use pwd::PwdCommand;
pub use setenv::SetenvCommand;

use crate::core::config::Config;
use crate::core::env::EnvError;

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    /// An OS call failed; `op` names it the way `perror` would.
    Failed {
        op: &'static str,
        source: std::io::Error,
    },
    EnvError(EnvError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "{}", msg),
            CommandError::Failed { op, source } => write!(f, "{}: {}", op, source),
            CommandError::EnvError(err) => write!(f, "setenv: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<EnvError> for CommandError {
    fn from(err: EnvError) -> Self {
        CommandError::EnvError(err)
    }
}

impl CommandError {
    pub(crate) fn failed(op: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| CommandError::Failed { op, source }
    }
}

/// A command run inside the shell process. `args` excludes the command name.
pub trait Command {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Pwd(PwdCommand),
    Echo(EchoCommand),
    Env(EnvCommand),
    Setenv(SetenvCommand),
    Exit(ExitCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, out),
            CommandType::Pwd(cmd) => cmd.execute(args, out),
            CommandType::Echo(cmd) => cmd.execute(args, out),
            CommandType::Env(cmd) => cmd.execute(args, out),
            CommandType::Setenv(cmd) => cmd.execute(args, out),
            CommandType::Exit(cmd) => cmd.execute(args, out),
        }
    }
}

/// Outcome of offering a command line to the built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    NotBuiltin,
}

#[derive(Clone)]
pub struct BuiltinDispatcher {
    commands: BTreeMap<&'static str, CommandType>,
}

impl BuiltinDispatcher {
    pub fn new(config: &Config) -> Self {
        let mut commands = BTreeMap::new();

        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("pwd", CommandType::Pwd(PwdCommand::new()));
        commands.insert(
            "echo",
            CommandType::Echo(EchoCommand::new(config.expand_vars)),
        );
        commands.insert("env", CommandType::Env(EnvCommand::new()));
        commands.insert("setenv", CommandType::Setenv(SetenvCommand::new()));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));

        Self { commands }
    }

    /// Runs `argv[0]` if it names a built-in. Never forks.
    pub fn dispatch(&self, argv: &[String], out: &mut dyn Write) -> Result<Dispatch, CommandError> {
        let Some((name, args)) = argv.split_first() else {
            return Ok(Dispatch::Handled);
        };

        match self.commands.get(name.as_str()) {
            Some(cmd) => {
                log::debug!("builtin: {}", name);
                cmd.execute(args, out)?;
                Ok(Dispatch::Handled)
            }
            None => Ok(Dispatch::NotBuiltin),
        }
    }

    #[cfg(test)]
    pub fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }
}
