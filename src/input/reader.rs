use std::io::{self, BufRead, IsTerminal, Write};

use rustyline::{config::Configurer, error::ReadlineError, DefaultEditor};

use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C typed at an interactive prompt.
    Interrupted,
    Eof,
}

/// Source of command lines.
///
/// A terminal gets rustyline editing and in-session history; anything
/// else is read line by line with the prompt written to `output`.
pub enum LineReader {
    Interactive(DefaultEditor),
    Buffered {
        input: Box<dyn BufRead>,
        output: Box<dyn Write>,
    },
}

impl LineReader {
    pub fn new() -> Result<Self, ShellError> {
        if io::stdin().is_terminal() {
            let mut editor = DefaultEditor::new()?;
            editor.set_auto_add_history(true);
            Ok(LineReader::Interactive(editor))
        } else {
            Ok(Self::buffered(
                Box::new(io::stdin().lock()),
                Box::new(io::stdout()),
            ))
        }
    }

    pub fn buffered(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        LineReader::Buffered { input, output }
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self {
            LineReader::Interactive(editor) => match editor.readline(prompt) {
                Ok(line) => Ok(ReadOutcome::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                Err(ReadlineError::Io(e)) if is_hangup(&e) => Ok(ReadOutcome::Eof),
                Err(e) => Err(e.into()),
            },
            LineReader::Buffered { input, output } => {
                output.write_all(prompt.as_bytes())?;
                output.flush()?;

                let mut line = String::new();
                match input.read_line(&mut line) {
                    Ok(0) => Ok(ReadOutcome::Eof),
                    Ok(_) => Ok(ReadOutcome::Line(line)),
                    Err(e) if is_hangup(&e) => Ok(ReadOutcome::Eof),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

/// `EIO` on the input means the terminal went away.
fn is_hangup(error: &io::Error) -> bool {
    error.raw_os_error() == Some(libc::EIO)
}
