//! Cooperative timing primitives: owned deadlines and repaint
//! coalescing.
//!
//! The surface is single-threaded and host-driven; nothing here spawns
//! or blocks. A [`Deadline`] is an owned handle: cancelling is a state
//! change on the value itself and dropping the owner drops the timer,
//! so a fired callback can never observe a destroyed surface.

use std::time::{Duration, Instant};

/// One-shot timer owned by its user. Disarmed by default.
#[derive(Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm to fire `after` from `now`. Re-arming replaces any
    /// pending deadline.
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.at = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// True exactly once when the deadline has passed; disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Coalesces repaint requests: any number of requests while one is
/// pending schedule exactly one unit of work.
#[derive(Debug, Default)]
pub struct RepaintGate {
    pending: bool,
}

impl RepaintGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint. Returns true only when this request newly
    /// scheduled one (callers propagate the schedule exactly then).
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
