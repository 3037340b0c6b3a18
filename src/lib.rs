pub mod app;
pub mod components;
pub mod config;
pub mod events;
pub mod game;
pub mod scheduler;
pub mod sound;
pub mod store;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

/// Wall-clock delta between frames, handed to the scheduler in whole milliseconds.
#[derive(Debug, Clone)]
pub struct Time {
    last_update: Instant,
    // Sub-millisecond remainder carried into the next update
    carry: Duration,
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            carry: Duration::default(),
        }
    }

    /// Measures the time since the last update and returns it in whole milliseconds.
    pub fn update(&mut self) -> u64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        self.last_update = now;
        self.take_millis(elapsed)
    }

    pub(crate) fn take_millis(&mut self, elapsed: Duration) -> u64 {
        let total = self.carry + elapsed;
        self.carry = Duration::from_nanos(u64::from(total.subsec_nanos() % 1_000_000));
        u64::try_from(total.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
