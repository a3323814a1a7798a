//! Timed preset rotation
//!
//! Steps through [`Preset::ALL`] on a fixed interval. The engine polls the
//! cycler once per tick and applies the returned preset to the first
//! segment.

use embassy_time::{Duration, Instant};

use crate::segment::Preset;

/// Interval used when none is configured
pub const DEFAULT_AUTO_CYCLE_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest accepted interval
pub const MIN_AUTO_CYCLE_INTERVAL: Duration = Duration::from_millis(500);

/// Preset rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCycler {
    interval: Duration,
    index: usize,
    next_change: Option<Instant>,
}

impl AutoCycler {
    /// Create a cycler starting at the first preset.
    ///
    /// Intervals below [`MIN_AUTO_CYCLE_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_AUTO_CYCLE_INTERVAL),
            index: 0,
            next_change: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval. The pending change keeps its deadline.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_AUTO_CYCLE_INTERVAL);
    }

    /// Preset the cycler is currently on
    pub fn current(&self) -> Preset {
        Preset::ALL[self.index]
    }

    /// Deadline of the next preset change, `None` before the first poll
    pub const fn next_change(&self) -> Option<Instant> {
        self.next_change
    }

    /// Returns the preset to apply at `now`, if one is due.
    ///
    /// The first poll yields the current preset right away. Later polls step
    /// to the next preset once the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Preset> {
        match self.next_change {
            None => {}
            Some(deadline) if now >= deadline => self.step(),
            Some(_) => return None,
        }
        self.next_change = Some(now + self.interval);
        Some(self.current())
    }

    /// Move to the next preset immediately and restart the interval
    pub fn skip_to_next(&mut self, now: Instant) -> Preset {
        self.step();
        self.next_change = Some(now + self.interval);
        self.current()
    }

    fn step(&mut self) {
        self.index = (self.index + 1) % Preset::ALL.len();
    }
}

impl Default for AutoCycler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_CYCLE_INTERVAL)
    }
}
