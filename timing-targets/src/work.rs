//! Per-symbol work charged by the comparators.

use std::hint::black_box;

/// Work performed every time a comparator inspects one symbol.
///
/// The comparators call [`Work::step`] once per loop iteration, so the total
/// cost of a comparison grows with the number of symbols inspected. This is
/// the leak the search crate measures.
pub trait Work {
    /// Perform one unit of work.
    fn step(&self);
}

/// No extra work: only the comparison loop itself leaks.
impl Work for () {
    #[inline]
    fn step(&self) {}
}

/// Busy loop of `n` black-boxed iterations per symbol.
///
/// Widens the per-symbol cost so the leak stands clear of timer resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin(pub u32);

impl Work for Spin {
    #[inline]
    fn step(&self) {
        for i in 0..self.0 {
            black_box(i);
        }
    }
}

/// Any closure, e.g. one advancing a simulated clock.
impl<F: Fn()> Work for F {
    #[inline]
    fn step(&self) {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_closure_work_is_called() {
        let count = Cell::new(0u32);
        let work = || count.set(count.get() + 1);
        work.step();
        work.step();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_spin_zero_is_noop() {
        Spin(0).step();
        ().step();
    }
}
