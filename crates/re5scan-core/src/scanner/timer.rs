use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;


/// Rate limiter for pointer re-resolution.
///
/// Due when it has never fired or when at least `interval` has passed since
/// it last fired. However long the gap, it fires once and then waits a full
/// interval again.
#[derive(Debug, Clone)]
pub struct ResolveTimer {
    interval: Duration,
    last: Option<Instant>,
}

impl ResolveTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Forget the last firing (e.g. after re-attaching)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
