use std::io::Write;
use std::sync::Arc;

use signal_hook::consts::SIGALRM;
use signal_hook::SigId;

use super::{ForegroundSlot, ProcessError};
use crate::highlight::Highlighter;

pub const INTERRUPT_NOTICE: &str =
    "\nCaught signal 2. Shell does not exit. Type 'exit' to quit shell.\n";

/// Owns the process-wide SIGINT and SIGALRM handlers.
///
/// SIGINT only prints a notice and the prompt again; it neither touches
/// the foreground record nor forwards the signal. The foreground child
/// shares the terminal's process group and gets the terminal's interrupt
/// directly. SIGALRM hands the foreground record to
/// [`ForegroundSlot::expire`].
pub struct SignalController {
    timeout_hook: SigId,
}

impl SignalController {
    pub fn install(
        prompt: &str,
        highlighter: Highlighter,
        foreground: Arc<ForegroundSlot>,
    ) -> Result<Self, ProcessError> {
        let banner = format!("{}{}", highlighter.highlight_notice(INTERRUPT_NOTICE), prompt);
        ctrlc::set_handler(move || {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(banner.as_bytes());
            let _ = stdout.flush();
        })
        .map_err(|e| ProcessError::SignalError(e.to_string()))?;

        // The closure runs in signal context: atomics and kill(2) only.
        let timeout_hook = unsafe {
            signal_hook::low_level::register(SIGALRM, move || {
                foreground.expire();
            })
        }
        .map_err(|e| ProcessError::SignalError(e.to_string()))?;

        log::debug!("signal handlers installed");
        Ok(Self { timeout_hook })
    }
}

impl Drop for SignalController {
    fn drop(&mut self) {
        let _ = signal_hook::low_level::unregister(self.timeout_hook);
    }
}
