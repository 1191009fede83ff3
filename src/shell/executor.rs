use std::io::Write;

use crate::core::commands::Dispatch;
use crate::error::ShellError;
use crate::process::{ExitOutcome, Launch};

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError>;
}

impl CommandHandler for super::Shell {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError> {
        let Some(parsed) = self.tokenizer.tokenize(line) else {
            return Ok(());
        };

        // Built-ins run in-process even when marked for the background.
        let dispatched = self.dispatcher.dispatch(&parsed.argv, &mut self.out);
        self.out.flush()?;
        if dispatched? == Dispatch::Handled {
            return Ok(());
        }

        match self.launcher.launch(&parsed.argv, parsed.background)? {
            Launch::Background(pid) => {
                let notice = format!("Process {} running in background", pid);
                writeln!(self.out, "{}", self.highlighter.highlight_hint(&notice))?;
            }
            Launch::Foreground {
                pid,
                outcome: ExitOutcome::TimedOut,
            } => {
                let notice = format!("\nForeground process {} terminated due to timeout", pid);
                writeln!(self.out, "{}", self.highlighter.highlight_notice(&notice))?;
            }
            Launch::Foreground { pid, outcome } => {
                log::debug!("{} ({}) finished: {:?}", parsed.argv[0], pid, outcome);
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::shell_over;
    use super::*;

    #[test]
    fn test_empty_line_is_noop() {
        let (mut shell, _, out) = shell_over("");
        shell.execute_line("\n").unwrap();
        shell.execute_line(" \t ").unwrap();
        shell.execute_line("&").unwrap();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_builtin_output() {
        let (mut shell, _, out) = shell_over("");
        shell.execute_line("echo hello world\n").unwrap();
        assert_eq!(out.contents(), "hello world \n");
    }

    #[test]
    fn test_builtin_marked_background_still_runs() {
        let (mut shell, _, out) = shell_over("");
        shell.execute_line("echo bg &\n").unwrap();
        assert_eq!(out.contents(), "bg \n");
        assert_eq!(shell.launcher.pending_background(), 0);
    }

    #[test]
    fn test_builtin_error_is_returned() {
        let (mut shell, _, _) = shell_over("");
        let result = shell.execute_line("cd /nonexistent/minish/dir");
        assert!(matches!(result, Err(ShellError::CommandError(_))));
    }

    #[test]
    fn test_external_foreground() {
        let (mut shell, _, out) = shell_over("");
        shell.execute_line("true\n").unwrap();
        assert_eq!(out.contents(), "");
        assert_eq!(shell.launcher.foreground().get(), None);
    }

    #[test]
    fn test_external_background_notice() {
        let (mut shell, _, out) = shell_over("");
        shell.execute_line("sleep 0.1 &\n").unwrap();

        let printed = out.contents();
        assert!(printed.starts_with("Process "));
        assert!(printed.ends_with(" running in background\n"));
        assert_eq!(shell.launcher.pending_background(), 1);
    }

    #[test]
    fn test_exitfoo_is_not_exit() {
        let (mut shell, _, _) = shell_over("");
        // Reaching the assertion at all means the process did not exit.
        shell.execute_line("exitfoo\n").unwrap();
        assert!(!shell.dispatcher.is_builtin("exitfoo"));
    }
}
