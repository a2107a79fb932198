//! Fall timer: a single re-armable deadline.
//!
//! Time is passed in by the caller so the timer can be driven by a real clock
//! in the run loop and by hand-built instants in tests.

use std::time::{Duration, Instant};

use crate::types::FALL_INTERVAL_MS;

#[derive(Debug, Clone)]
pub struct FallTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl FallTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the next fire one period after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Cancel, then arm. A pending fire from before the reset can never be observed.
    pub fn reset(&mut self, now: Instant) {
        self.cancel();
        self.arm(now);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Time left before the next fire, or `None` when cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

impl Default for FallTimer {
    fn default() -> Self {
        Self::new(Duration::from_millis(FALL_INTERVAL_MS))
    }
}
