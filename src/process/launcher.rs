use std::ffi::CString;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use super::{Alarm, ForegroundSlot, ProcessError};

/// How a waited-for child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
    /// Killed by the foreground timeout.
    TimedOut,
}

impl ExitOutcome {
    fn from_status(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ExitOutcome::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            ExitOutcome::Signaled(libc::WTERMSIG(status))
        } else {
            ExitOutcome::Exited(1)
        }
    }

    /// The signal that ended the child, counting a timeout kill as SIGKILL.
    pub fn signal(self) -> Option<i32> {
        match self {
            ExitOutcome::Exited(_) => None,
            ExitOutcome::Signaled(signal) => Some(signal),
            ExitOutcome::TimedOut => Some(libc::SIGKILL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Foreground {
        pid: libc::pid_t,
        outcome: ExitOutcome,
    },
    Background(libc::pid_t),
}

/// NUL-terminated argv built before forking, so the child does not allocate.
struct CStringVec {
    strings: Vec<CString>,
    ptrs: Vec<*const libc::c_char>,
}

impl CStringVec {
    fn from_args(args: &[String]) -> Result<Self, ProcessError> {
        let strings = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut ptrs: Vec<*const libc::c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(std::ptr::null());
        Ok(Self { strings, ptrs })
    }

    fn program(&self) -> *const libc::c_char {
        self.strings[0].as_ptr()
    }

    fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }
}

/// Forks and execs external commands.
///
/// Owns the foreground record and the timeout alarm; the signal
/// controller only gets a shared handle to the record.
pub struct ProcessLauncher {
    foreground: Arc<ForegroundSlot>,
    alarm: Alarm,
    timeout: Option<Duration>,
    /// Background pids not reaped yet. Never shown to the user.
    background: Vec<libc::pid_t>,
}

impl ProcessLauncher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            foreground: Arc::new(ForegroundSlot::new()),
            alarm: Alarm::new(),
            timeout,
            background: Vec::new(),
        }
    }

    pub fn foreground(&self) -> Arc<ForegroundSlot> {
        Arc::clone(&self.foreground)
    }

    /// Runs `argv[0]` found through `PATH` with `argv` as its arguments.
    pub fn launch(&mut self, argv: &[String], background: bool) -> Result<Launch, ProcessError> {
        if argv.is_empty() {
            return Err(ProcessError::InvalidArgument(String::new()));
        }
        let c_argv = CStringVec::from_args(argv)?;

        let pid = fork_exec(&c_argv)?;
        log::debug!("forked {} for {:?} (background: {})", pid, argv, background);

        if background {
            self.background.push(pid);
            return Ok(Launch::Background(pid));
        }

        let outcome = self.wait_foreground(pid)?;
        log::debug!("foreground {} finished: {:?}", pid, outcome);
        Ok(Launch::Foreground { pid, outcome })
    }

    fn wait_foreground(&self, pid: libc::pid_t) -> Result<ExitOutcome, ProcessError> {
        self.foreground.set(pid);
        if let Some(timeout) = self.timeout {
            if let Err(e) = self.alarm.arm(timeout) {
                log::warn!("foreground timeout not armed: {}", e);
            }
        }

        // The child stays a zombie until reaped below, so an expiry that
        // lands before `clear` only hits the zombie, never a reused pid.
        let exited = wait_exited(pid);

        self.foreground.clear();
        if self.timeout.is_some() {
            if let Err(e) = self.alarm.disarm() {
                log::warn!("foreground timeout not disarmed: {}", e);
            }
        }

        exited.map_err(ProcessError::Wait)?;
        let status = reap(pid).map_err(ProcessError::Wait)?;

        let outcome = ExitOutcome::from_status(status);
        let expired = self.foreground.take_expired() == Some(pid);
        if expired && outcome == ExitOutcome::Signaled(libc::SIGKILL) {
            Ok(ExitOutcome::TimedOut)
        } else {
            Ok(outcome)
        }
    }

    /// Collects the background children that have already exited.
    ///
    /// Only pids launched here are waited on, so children owned by other
    /// code in the process are left alone.
    pub fn reap_background(&mut self) -> Vec<(libc::pid_t, ExitOutcome)> {
        let mut reaped = Vec::new();
        self.background.retain(|&pid| match wait_for(pid, libc::WNOHANG) {
            Ok(Some(status)) => {
                reaped.push((pid, ExitOutcome::from_status(status)));
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::debug!("dropping background {}: {}", pid, e);
                false
            }
        });
        reaped
    }

    /// Background children launched but not reaped yet.
    pub fn pending_background(&self) -> usize {
        self.background.len()
    }
}

fn fork_exec(argv: &CStringVec) -> Result<libc::pid_t, ProcessError> {
    // Buffered prompt text must not be interleaved with the child's output.
    let _ = io::stdout().flush();

    match unsafe { libc::fork() } {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => {
            unsafe {
                libc::execvp(argv.program(), argv.as_ptr());
            }
            let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);
            let mut buf = [0u8; EXEC_FAILURE_BUF];
            let message = exec_failure_message(errno, &mut buf);
            unsafe {
                libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
                libc::_exit(libc::EXIT_FAILURE)
            }
        }
        pid => Ok(pid),
    }
}

const EXEC_FAILURE_BUF: usize = 256;
const EXEC_FAILURE_PREFIX: &[u8] = b"execvp: ";

/// Formats `execvp: <strerror>\n` into `buf` without allocating or
/// locking, since it runs in a forked child of a threaded process.
fn exec_failure_message(errno: libc::c_int, buf: &mut [u8; EXEC_FAILURE_BUF]) -> &[u8] {
    let prefix = EXEC_FAILURE_PREFIX.len();
    buf[..prefix].copy_from_slice(EXEC_FAILURE_PREFIX);

    // Leave room for the newline.
    let room = &mut buf[prefix..EXEC_FAILURE_BUF - 1];
    let ret = unsafe { libc::strerror_r(errno, room.as_mut_ptr().cast(), room.len()) };
    let len = if ret == 0 {
        room.iter().position(|&b| b == 0).unwrap_or(room.len())
    } else {
        let fallback = b"unknown error";
        room[..fallback.len()].copy_from_slice(fallback);
        fallback.len()
    };

    let end = prefix + len;
    buf[end] = b'\n';
    &buf[..=end]
}

/// Blocks until `pid` has exited, leaving it unreaped.
fn wait_exited(pid: libc::pid_t) -> io::Result<()> {
    loop {
        let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
        let ret = unsafe {
            libc::waitid(
                libc::P_PID,
                pid as libc::id_t,
                &mut info,
                libc::WEXITED | libc::WNOWAIT,
            )
        };
        if ret == 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// Blocking `waitpid` for a child known to have exited.
fn reap(pid: libc::pid_t) -> io::Result<libc::c_int> {
    wait_for(pid, 0)?.ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, format!("waitpid returned no status for {}", pid))
    })
}

/// `waitpid` retried across `EINTR`. `Ok(None)` only with `WNOHANG`.
fn wait_for(pid: libc::pid_t, flags: libc::c_int) -> io::Result<Option<libc::c_int>> {
    loop {
        let mut status: libc::c_int = 0;
        let ret = unsafe { libc::waitpid(pid, &mut status, flags) };
        if ret == pid {
            return Ok(Some(status));
        }
        if ret == 0 {
            return Ok(None);
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
