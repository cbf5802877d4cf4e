use crate::clock::Clock;
use crate::{Comparator, Encoding, GeneticConfig, GeneticSearch, Result, RunResult};

/// Runs a genetic timing attack against `comparator`.
///
/// Convenience wrapper around [`GeneticSearch`] using the wall clock.
///
/// # Arguments
///
/// * `comparator` - The vulnerable comparison under attack
/// * `encoding` - Alphabet and candidate length; the length must match the comparator's
/// * `config` - GA configuration (use `GeneticConfigBuilder` to construct)
///
/// # Errors
///
/// Returns a configuration error before any oracle call, or
/// `SearchError::Oracle` if the comparator fails during the run.
///
/// # Example
///
/// ```rust
/// use timing_search::{Encoding, FnComparator, GeneticConfigBuilder, genetic_search};
///
/// let oracle = FnComparator::new(2, |c: &str| c == "42");
/// let config = GeneticConfigBuilder::new()
///     .population_size(20)
///     .max_iterations(50)
///     .samples(1)
///     .seed(1)
///     .build()
///     .expect("valid config");
/// let result = genetic_search(oracle, Encoding::digits(2).unwrap(), config).unwrap();
/// assert!(result.iterations <= 50);
/// ```
pub fn genetic_search<C: Comparator>(
    comparator: C,
    encoding: Encoding,
    config: GeneticConfig,
) -> Result<RunResult> {
    let mut ga = GeneticSearch::new(comparator, encoding, config)?;
    ga.solve()
}

/// Same as [`genetic_search`], reading time from `clock`.
pub fn genetic_search_with_clock<C: Comparator, K: Clock>(
    comparator: C,
    clock: K,
    encoding: Encoding,
    config: GeneticConfig,
) -> Result<RunResult> {
    let mut ga = GeneticSearch::with_clock(comparator, clock, encoding, config)?;
    ga.solve()
}
