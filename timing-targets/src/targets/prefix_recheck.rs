//! Prefix re-checking comparator

use crate::Work;

/// Re-verifies the whole prefix every time it advances by one symbol.
///
/// After `k` matching symbols it has inspected `k(k+1)/2` symbols, so the
/// leak grows quadratically with the matching prefix.
#[derive(Debug, Clone)]
pub struct PrefixRecheck<W = ()> {
    secret: Vec<char>,
    work: W,
}

impl PrefixRecheck<()> {
    /// Comparator without extra per-symbol work.
    pub fn new(secret: &str) -> Self {
        Self::with_work(secret, ())
    }
}

impl<W: Work> PrefixRecheck<W> {
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
        let candidate: Vec<char> = candidate.chars().collect();
        if candidate.len() != self.secret.len() {
            return false;
        }
        for end in 1..=self.secret.len() {
            for i in 0..end {
                self.work.step();
                if self.secret[i] != candidate[i] {
                    return false;
                }
            }
        }
        true
    }
}
