use std::io;
use std::time::Duration;

use super::ProcessError;

/// One-shot SIGALRM timer backed by `setitimer(ITIMER_REAL)`.
///
/// The process has a single real-time timer, so arming replaces any
/// pending expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alarm;

impl Alarm {
    pub fn new() -> Self {
        Self
    }

    pub fn arm(&self, after: Duration) -> Result<(), ProcessError> {
        // A zero it_value would disarm instead of firing.
        let after = after.max(Duration::from_micros(1));
        self.set(after)
    }

    pub fn disarm(&self) -> Result<(), ProcessError> {
        self.set(Duration::ZERO)
    }

    /// Time left before the pending expiry, `None` when disarmed.
    #[cfg(test)]
    pub fn remaining(&self) -> Result<Option<Duration>, ProcessError> {
        let mut current = zeroed_itimerval();
        let ret = unsafe { libc::getitimer(libc::ITIMER_REAL, &mut current) };
        if ret != 0 {
            return Err(ProcessError::Timer(io::Error::last_os_error()));
        }

        let remaining = Duration::from_secs(current.it_value.tv_sec as u64)
            + Duration::from_micros(current.it_value.tv_usec as u64);
        Ok((!remaining.is_zero()).then_some(remaining))
    }

    fn set(&self, value: Duration) -> Result<(), ProcessError> {
        let out_of_range = || {
            ProcessError::Timer(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{:?} does not fit in a timeval", value),
            ))
        };

        let mut timer = zeroed_itimerval();
        timer.it_value.tv_sec =
            libc::time_t::try_from(value.as_secs()).map_err(|_| out_of_range())?;
        timer.it_value.tv_usec =
            libc::suseconds_t::try_from(value.subsec_micros()).map_err(|_| out_of_range())?;

        let ret =
            unsafe { libc::setitimer(libc::ITIMER_REAL, &timer, std::ptr::null_mut()) };
        if ret != 0 {
            return Err(ProcessError::Timer(io::Error::last_os_error()));
        }
        Ok(())
    }
}

fn zeroed_itimerval() -> libc::itimerval {
    libc::itimerval {
        it_interval: libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
        it_value: libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
    }
}
