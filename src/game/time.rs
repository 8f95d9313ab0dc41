//! Tick clock
//!
//! Turns wall-clock frame deltas into discrete tick events. The core never
//! looks at time itself; the front-end feeds it one `Event::Tick` per tick
//! reported here.

use std::time::Duration;

/// Accumulates elapsed time and reports whole ticks
pub struct TickClock {
    /// Time between ticks
    interval: Duration,
    /// Time since the last tick
    since_last_tick: Duration,
    /// Ticks reported so far
    ticks: u64,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            since_last_tick: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Add elapsed time and return how many ticks are now due
    pub fn update(&mut self, delta: Duration) -> u32 {
        self.since_last_tick += delta;
        let mut due = 0;
        while self.since_last_tick >= self.interval {
            self.since_last_tick -= self.interval;
            due += 1;
        }
        self.ticks += due as u64;
        due
    }

    /// How long until the next tick is due (for input polling)
    pub fn until_next(&self) -> Duration {
        self.interval.saturating_sub(self.since_last_tick)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_whole_ticks() {
        let mut clock = TickClock::new(Duration::from_millis(10));
        assert_eq!(clock.update(Duration::from_millis(5)), 0);
        assert_eq!(clock.update(Duration::from_millis(5)), 1);
        assert_eq!(clock.update(Duration::from_millis(35)), 3);
        assert_eq!(clock.ticks(), 4);
        assert_eq!(clock.until_next(), Duration::from_millis(5));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut clock = TickClock::new(Duration::ZERO);
        assert_eq!(clock.update(Duration::from_millis(3)), 3);
    }
}
