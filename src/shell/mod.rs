use std::io::{self, Write};

mod executor;

use crate::{
    core::{commands::BuiltinDispatcher, config::Config},
    error::ShellError,
    highlight::Highlighter,
    input::{LineReader, ReadOutcome, Tokenizer},
    process::{signal::INTERRUPT_NOTICE, ProcessLauncher, SignalController},
};

pub(crate) use executor::CommandHandler;

/// Consecutive read failures tolerated before the loop gives up.
const MAX_READ_ERRORS: usize = 5;

pub struct Shell {
    pub(crate) reader: LineReader,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) dispatcher: BuiltinDispatcher,
    pub(crate) launcher: ProcessLauncher,
    pub(crate) highlighter: Highlighter,
    pub(crate) config: Config,
    pub(crate) out: Box<dyn Write>,
    signals: Option<SignalController>,
}

impl Shell {
    pub fn new(config: Config) -> Result<Self, ShellError> {
        let reader = LineReader::new()?;
        Ok(Self::with_io(config, reader, Box::new(io::stdout())))
    }

    /// A shell over arbitrary input and output, without signal handlers.
    pub fn with_io(config: Config, reader: LineReader, out: Box<dyn Write>) -> Self {
        Shell {
            reader,
            tokenizer: Tokenizer::new(config.max_args),
            dispatcher: BuiltinDispatcher::new(&config),
            launcher: ProcessLauncher::new(config.timeout),
            highlighter: Highlighter::new(config.color),
            config,
            out,
            signals: None,
        }
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        if self.signals.is_none() {
            self.signals = Some(SignalController::install(
                &self.config.prompt,
                self.highlighter,
                self.launcher.foreground(),
            )?);
        }
        self.repl()
    }

    /// Prompt, read, dispatch until end of input.
    pub(crate) fn repl(&mut self) -> Result<(), ShellError> {
        let mut read_errors = 0;
        loop {
            self.reap_background();

            let read = self.reader.read_line(&self.config.prompt);
            if read.is_ok() {
                read_errors = 0;
            }

            match read {
                Ok(ReadOutcome::Line(line)) => {
                    if let Err(e) = self.execute_line(&line) {
                        self.report(&e);
                    }
                }
                Ok(ReadOutcome::Interrupted) => {
                    let notice = self.highlighter.highlight_notice(INTERRUPT_NOTICE);
                    write!(self.out, "{}", notice)?;
                    self.out.flush()?;
                }
                Ok(ReadOutcome::Eof) => break,
                Err(e) => {
                    read_errors += 1;
                    if read_errors >= MAX_READ_ERRORS {
                        return Err(e);
                    }
                    self.report(&e);
                }
            }
        }

        self.out.flush()?;
        log::debug!("end of input");
        Ok(())
    }

    fn reap_background(&mut self) {
        for (pid, outcome) in self.launcher.reap_background() {
            log::info!("background process {} finished: {:?}", pid, outcome);
        }
        match self.launcher.pending_background() {
            0 => {}
            pending => log::debug!("{} background processes still running", pending),
        }
    }

    pub(crate) fn report(&mut self, error: &ShellError) {
        let _ = self.out.flush();
        eprintln!("{}", self.highlighter.highlight_error(&error.to_string()));
    }
}
