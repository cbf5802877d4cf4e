//! Timing oracle adapter.
//!
//! Turns a [`Comparator`] into a fitness function: each measurement times
//! `samples` calls to the comparator and reduces the elapsed times to their
//! median.
//!
//! The adapter never caches and never logs. Anything between the two clock
//! reads would end up in the signal.

use crate::clock::{Clock, MonotonicClock};
use crate::encoding::Candidate;
use crate::error::{Result, SearchError};
use crate::oracle::Comparator;
use std::hint::black_box;

/// Default number of timing samples per candidate.
pub const DEFAULT_SAMPLES: usize = 10;

/// Result of timing one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Median elapsed time in nanoseconds.
    pub fitness: f64,
    /// The comparator reported an exact match.
    pub matched: bool,
}

/// Median of `data`, averaging the two middle values for even lengths.
///
/// Uses `select_nth_unstable_by`, so `data` is partially reordered.
/// Returns 0 for an empty slice.
pub fn median(data: &mut [f64]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    let (lower, &mut upper_mid, _) = data.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    if n % 2 == 1 {
        return upper_mid;
    }
    let lower_mid = lower
        .iter()
        .copied()
        .max_by(|a, b| a.total_cmp(b))
        .unwrap_or(upper_mid);
    0.5 * (lower_mid + upper_mid)
}

/// Times a comparator with repeated sampling.
#[derive(Debug, Clone)]
pub struct TimingOracle<C, K = MonotonicClock> {
    comparator: C,
    clock: K,
    samples: usize,
}

impl<C: Comparator> TimingOracle<C, MonotonicClock> {
    /// Adapter timing `comparator` with the wall clock.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidSampleCount` if `samples == 0`.
    pub fn new(comparator: C, samples: usize) -> Result<Self> {
        Self::with_clock(comparator, MonotonicClock::new(), samples)
    }
}

impl<C: Comparator, K: Clock> TimingOracle<C, K> {
    /// Adapter timing `comparator` with `clock`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidSampleCount` if `samples == 0`.
    pub fn with_clock(comparator: C, clock: K, samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(SearchError::InvalidSampleCount);
        }
        Ok(Self {
            comparator,
            clock,
            samples,
        })
    }

    /// Number of samples per measurement.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Secret length the comparator expects.
    pub fn secret_len(&self) -> usize {
        self.comparator.secret_len()
    }

    /// The wrapped comparator.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Time `candidate` and return its median elapsed time and match verdict.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Oracle` if the comparator fails on any sample.
    pub fn measure(&self, candidate: &Candidate) -> Result<Measurement> {
        let input = candidate.as_str();
        let mut elapsed = Vec::with_capacity(self.samples);
        let mut matched = false;
        for _ in 0..self.samples {
            let start = self.clock.now_ns();
            let verdict = self.comparator.compare(black_box(input));
            let end = self.clock.now_ns();
            match verdict {
                Ok(v) => matched |= black_box(v),
                Err(source) => {
                    return Err(SearchError::Oracle {
                        candidate: input.to_string(),
                        source,
                    });
                }
            }
            elapsed.push(end.saturating_sub(start) as f64);
        }
        Ok(Measurement {
            fitness: median(&mut elapsed),
            matched,
        })
    }
}
