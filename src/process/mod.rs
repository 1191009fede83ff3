use std::fmt;

pub mod alarm;
pub mod foreground;
pub mod launcher;
pub mod signal;

pub use alarm::Alarm;
pub use foreground::ForegroundSlot;
pub use launcher::{ExitOutcome, Launch, ProcessLauncher};
pub use signal::SignalController;

#[derive(Debug)]
pub enum ProcessError {
    /// `fork` itself failed; no child exists.
    Fork(std::io::Error),
    Wait(std::io::Error),
    Timer(std::io::Error),
    InvalidArgument(String),
    SignalError(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "fork: {}", e),
            ProcessError::Wait(e) => write!(f, "waitpid: {}", e),
            ProcessError::Timer(e) => write!(f, "setitimer: {}", e),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "invalid argument (embedded NUL): {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}
