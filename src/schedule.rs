//! Recurring task scheduling for continuous mode
//!
//! The run loop checks a single recurring task roughly once per second and
//! executes it when it comes due. The first execution is due only after one
//! full period has elapsed, and each completed run schedules the next one
//! relative to its completion time, so a slow cycle pushes the following
//! window back instead of triggering a burst of catch-up runs.

use std::time::{Duration, Instant};

/// Sleep between due-checks in the run loop
pub const TICK: Duration = Duration::from_secs(1);

/// A single task that becomes due at a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringTask {
    period: Duration,
    next_run: Instant,
}

impl RecurringTask {
    /// Create a task first due one full `period` after `start`
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_run: start + period,
        }
    }

    /// Create a task first due one full `period` from now
    pub fn starting_now(period: Duration) -> Self {
        Self::new(period, Instant::now())
    }

    /// Whether the task should run at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_run
    }

    /// Record a run completed at `finished`, scheduling the next one
    pub fn advance(&mut self, finished: Instant) {
        self.next_run = finished + self.period;
    }
}
