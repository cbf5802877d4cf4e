//! Time sources for the timing oracle.
//!
//! Provides:
//! - [`MonotonicClock`]: `std::time::Instant`, the clock used for real attacks
//! - [`SimulatedClock`]: a counter advanced by hand, for reproducible runs

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A source of nanosecond timestamps.
pub trait Clock {
    /// Current time in nanoseconds since an arbitrary fixed origin.
    fn now_ns(&self) -> u64;
}

/// Wall clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Clock whose origin is the moment of creation.
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
    #[inline]
    fn now_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Manually advanced clock.
///
/// Clones share the same counter, so a comparator can charge simulated time
/// that the oracle adapter then reads back. Single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Rc<Cell<u64>>,
}

impl SimulatedClock {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ns`.
    pub fn advance(&self, ns: u64) {
        self.now.set(self.now.get().saturating_add(ns));
    }
}

impl Clock for SimulatedClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_clock_is_shared() {
        let clock = SimulatedClock::new();
        let handle = clock.clone();
        handle.advance(25);
        handle.advance(5);
        assert_eq!(clock.now_ns(), 30);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(b >= a);
    }
}
