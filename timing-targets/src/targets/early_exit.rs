//! Early-exit comparator

use crate::Work;

/// Compares a candidate against the secret one symbol at a time and returns
/// on the first mismatch.
///
/// Candidates of the wrong length are rejected before the loop runs. The time
/// spent is proportional to the length of the matching prefix.
#[derive(Debug, Clone)]
pub struct EarlyExit<W = ()> {
    secret: Vec<char>,
    work: W,
}

impl EarlyExit<()> {
    /// Comparator without extra per-symbol work.
    pub fn new(secret: &str) -> Self {
        Self::with_work(secret, ())
    }
}

impl<W: Work> EarlyExit<W> {
    /// Comparator charging `work` once per inspected symbol.
    pub fn with_work(secret: &str, work: W) -> Self {
        Self {
            secret: secret.chars().collect(),
            work,
        }
    }

    /// Secret length in symbols.
    pub fn secret_len(&self) -> usize {
        self.secret.len()
    }

    /// Returns `true` if `candidate` equals the secret.
    pub fn validate(&self, candidate: &str) -> bool {
        if candidate.chars().count() != self.secret.len() {
            return false;
        }
        for (expected, got) in self.secret.iter().zip(candidate.chars()) {
            self.work.step();
            if *expected != got {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_early_exit_matches_only_secret() {
        let target = EarlyExit::new("0123456789");
        assert!(target.validate("0123456789"));
        assert!(!target.validate("0123456780"));
        assert!(!target.validate("012345678"));
        assert!(!target.validate(""));
    }

    #[test]
    fn test_early_exit_work_follows_prefix() {
        let steps = Cell::new(0usize);
        let target = EarlyExit::with_work("0000", || steps.set(steps.get() + 1));

        target.validate("1000");
        assert_eq!(steps.replace(0), 1);

        target.validate("0010");
        assert_eq!(steps.replace(0), 3);

        target.validate("0000");
        assert_eq!(steps.replace(0), 4);

        // Length mismatch is rejected before any symbol is inspected
        target.validate("00000");
        assert_eq!(steps.get(), 0);
    }
}
