//! Per-question countdown.
//!
//! The countdown itself never schedules anything: something outside calls
//! [`Countdown::tick`] once per second while it runs.

use log::debug;

/// Seconds allowed per question unless configured otherwise.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

/// Result of a single [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// The countdown was not running; nothing changed.
    Idle,
    Running { remaining: u32 },
    /// Reached zero on this tick and stopped itself.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
    running: bool,
    epoch: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT_SECS)
    }
}

impl Countdown {
    /// A stopped countdown with the given limit.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
            running: false,
            epoch: 0,
        }
    }

    /// Resets to `limit` and starts running. Returns the new epoch.
    ///
    /// Each start bumps the epoch, so a driver can tell two runs apart even
    /// when they have the same limit.
    pub fn start(&mut self, limit: u32) -> u64 {
        self.limit = limit;
        self.remaining = limit;
        self.running = true;
        self.epoch = self.epoch.wrapping_add(1);
        debug!("[Timer] Countdown {} started at {}s", self.epoch, limit);
        self.epoch
    }

    pub fn tick(&mut self) -> CountdownTick {
        if !self.running {
            return CountdownTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            debug!("[Timer] Countdown {} expired", self.epoch);
            CountdownTick::Expired
        } else {
            CountdownTick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Halts the countdown, keeping `remaining` as is. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds consumed since the last start.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.limit - self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
