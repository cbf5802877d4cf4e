use crate::clock::Clock;
use crate::{Comparator, Encoding, ParticleSwarm, Result, RunResult, SwarmConfig};

/// Runs a particle-swarm timing attack against `comparator`.
///
/// Convenience wrapper around [`ParticleSwarm`] using the wall clock.
///
/// # Errors
///
/// Returns a configuration error before any oracle call, or
/// `SearchError::Oracle` if the comparator fails during the run.
///
/// # Example
///
/// ```rust
/// use timing_search::{Encoding, FnComparator, SwarmConfigBuilder, particle_swarm};
///
/// let oracle = FnComparator::new(3, |c: &str| c == "314");
/// let config = SwarmConfigBuilder::new()
///     .swarm_size(10)
///     .max_iterations(20)
///     .samples(1)
///     .seed(5)
///     .build()
///     .expect("valid config");
/// let result = particle_swarm(oracle, Encoding::digits(3).unwrap(), config).unwrap();
/// assert!(result.evaluations <= 200);
/// ```
pub fn particle_swarm<C: Comparator>(
    comparator: C,
    encoding: Encoding,
    config: SwarmConfig,
) -> Result<RunResult> {
    let mut pso = ParticleSwarm::new(comparator, encoding, config)?;
    pso.solve()
}

/// Same as [`particle_swarm`], reading time from `clock`.
pub fn particle_swarm_with_clock<C: Comparator, K: Clock>(
    comparator: C,
    clock: K,
    encoding: Encoding,
    config: SwarmConfig,
) -> Result<RunResult> {
    let mut pso = ParticleSwarm::with_clock(comparator, clock, encoding, config)?;
    pso.solve()
}
