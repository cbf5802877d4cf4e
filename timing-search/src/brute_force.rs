//! Exhaustive enumeration baseline.
//!
//! Walks numeric positions upward from zero and asks the comparator about
//! each candidate directly. No timing is involved.

use crate::encoding::{Candidate, Encoding};
use crate::error::{Result, SearchError};
use crate::oracle::Comparator;
use crate::result::{FitnessHistory, RunResult};

/// Configuration for [`brute_force`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BruteForceConfig {
    /// Maximum number of candidates to try; `None` walks the whole space.
    pub limit: Option<u64>,
    /// Stop at the first match instead of scanning on.
    pub early_stop: bool,
}

/// Enumerate candidates `0, 1, 2, ...` in the encoding's numeric order.
///
/// # Errors
///
/// Returns `SearchError::LengthMismatch` if the encoding length differs
/// from the comparator's, and `SearchError::Oracle` if the comparator fails.
pub fn brute_force<C: Comparator>(
    comparator: &C,
    encoding: &Encoding,
    config: BruteForceConfig,
) -> Result<RunResult> {
    if encoding.length() != comparator.secret_len() {
        return Err(SearchError::LengthMismatch {
            configured: encoding.length(),
            expected: comparator.secret_len(),
        });
    }
    let space = encoding.max_position();
    let last = match config.limit {
        Some(0) => None,
        Some(limit) => Some((limit - 1).min(space)),
        None => Some(space),
    };
    log::info!(
        "Brute force: length={}, alphabet={}, candidates={}, early_stop={}",
        encoding.length(),
        encoding.alphabet().size(),
        last.map_or(0, |l| l as u128 + 1),
        config.early_stop
    );

    let mut solution: Option<Candidate> = None;
    let mut tried = 0usize;
    let mut message = "Search space exhausted".to_string();
    if let Some(last) = last {
        for position in 0..=last {
            let candidate = encoding.to_symbolic(position)?;
            tried += 1;
            let matched = comparator
                .compare(candidate.as_str())
                .map_err(|source| SearchError::Oracle {
                    candidate: candidate.to_string(),
                    source,
                })?;
            if matched && solution.is_none() {
                log::info!("Brute force: secret found at position {}: {}", position, candidate);
                solution = Some(candidate);
                if config.early_stop {
                    message = format!("Secret found after {} candidates", tried);
                    break;
                }
            }
        }
        if !(config.early_stop && solution.is_some()) && last < space {
            message = format!("Candidate limit reached: {}", tried);
        }
    } else {
        message = "Candidate limit reached: 0".to_string();
    }
    log::info!("Brute force finished: {}", message);

    Ok(RunResult {
        found: solution.is_some(),
        best: None,
        solution,
        history: FitnessHistory::new(),
        iterations: tried,
        evaluations: tried,
        message,
    })
}
