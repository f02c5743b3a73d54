//! Time sources for line sampling
//!
//! The dispatcher only reads the clock for events that are in scope, so the
//! cost of a clock read is paid once per profiled line.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic microsecond time source
pub trait Clock {
    /// Current time in microseconds. Must never go backward.
    fn now_micros(&self) -> u64;
}

/// Wall-clock monotonic time measured from when the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Explicitly driven clock
///
/// Clones share the same underlying time, so a host can keep one handle and
/// hand the other to the profiler. Used for replaying recorded traces and in
/// tests that need exact timings.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Set the current time
    pub fn set(&self, micros: u64) {
        self.now.set(micros);
    }

    /// Move the current time forward
    pub fn advance(&self, micros: u64) {
        self.now.set(self.now.get().saturating_add(micros));
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let before = clock.now_micros();
        thread::sleep(Duration::from_millis(5));
        let after = clock.now_micros();

        assert!(after >= before + 5_000);
        assert!(after < before + 500_000); // Allow some slack
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now_micros(), 1000);

        clock.advance(5);
        assert_eq!(clock.now_micros(), 1005);

        clock.set(2000);
        assert_eq!(clock.now_micros(), 2000);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let host_side = ManualClock::new(0);
        let profiler_side = host_side.clone();

        host_side.set(42);
        assert_eq!(profiler_side.now_micros(), 42);
    }
}
