//! Simulated time
//!
//! The simulation clock is a plain tick counter. It is advanced only by the
//! run loop of [`System`](crate::System), always to the timestamp of the job
//! being executed, and never moves backwards.

use serde::{Deserialize, Serialize};

/// A point in simulated time, in ticks.
pub type SimTime = u64;

/// Monotonic simulation clock
///
/// # Example
/// ```
/// use netsim_core::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0);
///
/// assert!(clock.advance_to(5));
/// assert_eq!(clock.now(), 5);
///
/// // Going backwards is refused and leaves the clock untouched
/// assert!(!clock.advance_to(3));
/// assert_eq!(clock.now(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulated time
    now: SimTime,
}

impl SimClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `time`
    ///
    /// Returns `false` (and leaves the clock where it is) when `time` lies in
    /// the past. Advancing to the current time is a no-op that succeeds.
    pub fn advance_to(&mut self, time: SimTime) -> bool {
        if time < self.now {
            return false;
        }
        self.now = time;
        true
    }

    /// Absolute time `delay` ticks from now, saturating at `SimTime::MAX`
    pub fn after(&self, delay: SimTime) -> SimTime {
        self.now.saturating_add(delay)
    }

    /// Rewind to time zero (only used between runs)
    pub fn reset(&mut self) {
        self.now = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_saturates() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime::MAX - 1);
        assert_eq!(clock.after(10), SimTime::MAX);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut clock = SimClock::new();
        clock.advance_to(42);
        clock.reset();
        assert_eq!(clock.now(), 0);
    }
}
