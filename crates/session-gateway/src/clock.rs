//! Wall-clock seam.
//!
//! Minting, expiry and renewal decisions all take `now` from a [`Clock`] so the
//! gateway's state machine can be driven deterministically in tests.

/// Source of the current time in Unix epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
