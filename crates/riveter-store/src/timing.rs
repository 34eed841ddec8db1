//! Debounce/throttle utilities for checkpointing and output actions.
//!
//! Each is a small stateful object owning its own deadline, driven by a
//! caller-supplied clock so tests never have to sleep.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer: `arm` (re)starts the delay, `fire` reports — and
/// consumes — a deadline that has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start (or restart) the delay from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True when a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once per armed deadline, when `now` has
    /// reached it.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Leading-edge throttler: the first call passes, further calls are swallowed
/// until the interval elapses.
#[derive(Debug, Clone)]
pub struct Throttler {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` when the action should run now.
    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
