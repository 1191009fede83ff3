use std::sync::atomic::{AtomicI32, Ordering};

/// Single-slot record of the foreground child the shell is waiting on.
///
/// Shared between the main loop and the SIGALRM handler, so every access
/// is one atomic load, store or swap. `0` means no foreground child.
#[derive(Debug, Default)]
pub struct ForegroundSlot {
    pid: AtomicI32,
    expired: AtomicI32,
}

impl ForegroundSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pid: libc::pid_t) {
        self.expired.store(0, Ordering::SeqCst);
        self.pid.store(pid, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn get(&self) -> Option<libc::pid_t> {
        match self.pid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }

    /// Empties the slot, returning what it held.
    pub fn take(&self) -> Option<libc::pid_t> {
        match self.pid.swap(0, Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }

    pub fn clear(&self) {
        self.pid.store(0, Ordering::SeqCst);
    }

    /// Kills the tracked child, if any, and remembers it as timed out.
    ///
    /// Runs inside the SIGALRM handler: only atomics and `kill(2)`, both
    /// async-signal-safe.
    pub fn expire(&self) -> Option<libc::pid_t> {
        let pid = self.take()?;
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
        self.expired.store(pid, Ordering::SeqCst);
        Some(pid)
    }

    /// The pid killed by [`expire`](Self::expire) since the last `set`, consumed once.
    pub fn take_expired(&self) -> Option<libc::pid_t> {
        match self.expired.swap(0, Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }
}
