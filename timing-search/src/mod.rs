//! Timing side-channel search library.
//!
//! This crate recovers a secret from a comparison routine whose running time
//! grows with the length of the matching prefix. Candidates are scored by
//! timing the comparator, and the scores drive a genetic search or a
//! particle-swarm search toward the secret.
//!
//! # Features
//!
//! - Timing oracle adapter with median-of-N sampling and pluggable clocks
//! - Genetic engine: roulette selection, single-point crossover, point mutation
//! - Particle-swarm engine with scalar or per-symbol positions
//! - Early stop at a confirmed match, per member or per iteration
//! - Brute-force baseline
//! - CSV history recording
//!
//! # Example
//!
//! ```rust
//! use timing_search::{Encoding, GeneticConfigBuilder, SimulatedClock, genetic_search_with_clock};
//! use timing_targets::EarlyExit;
//!
//! // A leaky comparator whose work advances a simulated clock.
//! let clock = SimulatedClock::new();
//! let tick = clock.clone();
//! let oracle = EarlyExit::with_work("0000", move || tick.advance(10));
//!
//! let config = GeneticConfigBuilder::new()
//!     .population_size(30)
//!     .max_iterations(100)
//!     .samples(1)
//!     .seed(42)
//!     .build()
//!     .expect("invalid config");
//!
//! let result = genetic_search_with_clock(oracle, clock, Encoding::digits(4).unwrap(), config)
//!     .expect("search should run");
//! assert!(result.iterations <= 100);
//! ```

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod error;
pub use error::{OracleFault, Result, SearchError};

mod argmax;

/// Brute-force enumeration baseline.
pub mod brute_force;
/// Position rounding and clamping for swarm updates.
pub mod clamp_position;
/// Clocks read by the timing oracle.
pub mod clock;
/// Single-point crossover.
pub mod crossover_single_point;
/// Alphabets, candidates and their numeric encoding.
pub mod encoding;
/// Genetic search engine and configuration.
pub mod genetic;
/// Convenience entry point for the genetic engine.
pub mod genetic_search;
/// Random population and swarm initialization.
mod init_random;
/// Point mutation.
mod mutate_point;
/// Comparator trait and closure adapters.
pub mod oracle;
/// Convenience entry point for the swarm engine.
pub mod particle_swarm;
/// History recording to CSV.
pub mod recorder;
/// Run results and fitness history.
pub mod result;
/// Recorded search wrappers.
pub mod run_recorded;
/// Fitness-proportional parent selection.
mod select_roulette;
/// Particle-swarm search engine and configuration.
pub mod swarm;
/// Iteration budget and early-stop policy.
pub mod termination;
/// Timing oracle adapter.
pub mod timing;

/// Engine tests for the particle swarm.
#[cfg(test)]
mod pso_tests;

pub use brute_force::{BruteForceConfig, brute_force};
pub use clamp_position::clamp_position;
pub use clock::{Clock, MonotonicClock, SimulatedClock};
pub use crossover_single_point::do_crossover;
pub use encoding::{Alphabet, Candidate, Encoding};
pub use genetic::{GeneticConfig, GeneticConfigBuilder, GeneticSearch};
pub use genetic_search::{genetic_search, genetic_search_with_clock};
pub use oracle::{Comparator, FnComparator, TryFnComparator};
pub use particle_swarm::{particle_swarm, particle_swarm_with_clock};
pub use recorder::{HistoryRecorder, ProgressRecord};
pub use result::{FitnessHistory, HistoryPoint, RunResult};
pub use run_recorded::{run_recorded_genetic_search, run_recorded_particle_swarm};
pub use swarm::{
    GlobalBest, Particle, ParticleSwarm, PositionEncoding, SwarmConfig, SwarmConfigBuilder,
    SwarmUpdate,
};
pub use termination::{EarlyStop, Termination};
pub use timing::{DEFAULT_SAMPLES, Measurement, TimingOracle, median};

/// Callback function type
pub type CallbackFn = Box<dyn FnMut(&SearchIntermediate) -> CallbackAction>;

/// Snapshot passed to the per-iteration callback.
#[derive(Debug, Clone)]
pub struct SearchIntermediate {
    /// Best-known candidate (the global best for the swarm).
    pub best: Candidate,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Mean fitness of the members evaluated this iteration.
    pub average: f64,
    /// Highest fitness measured this iteration.
    pub iteration_best: f64,
    /// Whether the secret has been matched.
    pub found: bool,
    /// Current iteration number (1-based).
    pub iter: usize,
}

/// Action returned by callback to control the search.
pub enum CallbackAction {
    /// Continue searching.
    Continue,
    /// Stop the search early.
    Stop,
}
