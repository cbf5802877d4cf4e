//! The comparator seam between the search engines and the attacked code.

use crate::error::OracleFault;

/// A secret-guarding comparison function.
///
/// The search core only calls [`compare`](Comparator::compare) and measures
/// the time around the call. Returning `Err` aborts the run.
pub trait Comparator {
    /// Number of symbols the comparator expects.
    fn secret_len(&self) -> usize;

    /// Returns `Ok(true)` if `candidate` equals the secret.
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault>;
}

impl<T: Comparator + ?Sized> Comparator for &T {
    fn secret_len(&self) -> usize {
        (**self).secret_len()
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        (**self).compare(candidate)
    }
}

/// Adapts an infallible closure `Fn(&str) -> bool` into a [`Comparator`].
#[derive(Debug, Clone)]
pub struct FnComparator<F> {
    secret_len: usize,
    f: F,
}

impl<F> FnComparator<F>
where
    F: Fn(&str) -> bool,
{
    /// Comparator for a secret of `secret_len` symbols.
    pub fn new(secret_len: usize, f: F) -> Self {
        Self { secret_len, f }
    }
}

impl<F> Comparator for FnComparator<F>
where
    F: Fn(&str) -> bool,
{
    fn secret_len(&self) -> usize {
        self.secret_len
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        Ok((self.f)(candidate))
    }
}

/// Adapts a fallible closure into a [`Comparator`].
#[derive(Debug, Clone)]
pub struct TryFnComparator<F> {
    secret_len: usize,
    f: F,
}

impl<F> TryFnComparator<F>
where
    F: Fn(&str) -> Result<bool, OracleFault>,
{
    /// Comparator for a secret of `secret_len` symbols.
    pub fn new(secret_len: usize, f: F) -> Self {
        Self { secret_len, f }
    }
}

impl<F> Comparator for TryFnComparator<F>
where
    F: Fn(&str) -> Result<bool, OracleFault>,
{
    fn secret_len(&self) -> usize {
        self.secret_len
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        (self.f)(candidate)
    }
}

impl<W: timing_targets::Work> Comparator for timing_targets::AnyTarget<W> {
    fn secret_len(&self) -> usize {
        timing_targets::AnyTarget::secret_len(self)
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        Ok(self.validate(candidate))
    }
}

impl<W: timing_targets::Work> Comparator for timing_targets::EarlyExit<W> {
    fn secret_len(&self) -> usize {
        timing_targets::EarlyExit::secret_len(self)
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        Ok(self.validate(candidate))
    }
}

impl<W: timing_targets::Work> Comparator for timing_targets::PrefixRecheck<W> {
    fn secret_len(&self) -> usize {
        timing_targets::PrefixRecheck::secret_len(self)
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        Ok(self.validate(candidate))
    }
}

impl Comparator for timing_targets::ConstantTime {
    fn secret_len(&self) -> usize {
        timing_targets::ConstantTime::secret_len(self)
    }

    #[inline]
    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        Ok(self.validate(candidate))
    }
}
