//! Genetic search over fixed-length candidates.
//!
//! Each generation evaluates every member once through the timing oracle,
//! draws parents by roulette selection on the measured times, recombines
//! them with single-point crossover and applies point mutation. Children
//! replace the whole population. A confirmed match is kept apart from the
//! population so later churn cannot lose it.

use crate::argmax::argmax;
use crate::clock::{Clock, MonotonicClock};
use crate::crossover_single_point::crossover_pair;
use crate::encoding::{Candidate, Encoding};
use crate::error::{Result, SearchError};
use crate::init_random::init_population;
use crate::mutate_point::mutate_point;
use crate::oracle::Comparator;
use crate::result::{FitnessHistory, RunResult};
use crate::select_roulette::select_roulette;
use crate::termination::{EarlyStop, Termination};
use crate::timing::{DEFAULT_SAMPLES, TimingOracle};
use crate::{CallbackAction, CallbackFn, SearchIntermediate};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for [`GeneticSearch`].
pub struct GeneticConfig {
    /// Number of members per generation.
    pub population_size: usize,
    /// Generation budget; `0` runs until early stop fires.
    pub max_iterations: usize,
    /// Probability in `[0, 1]` that a child receives a point mutation.
    pub mutation_pct: f64,
    /// Early-stop granularity.
    pub early_stop: EarlyStop,
    /// Timing samples per measurement.
    pub samples: usize,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Log progress every this many generations (`0` disables).
    pub progress_every: usize,
    /// Optional per-generation callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_iterations: 200,
            mutation_pct: 0.5,
            early_stop: EarlyStop::EndOfIteration,
            samples: DEFAULT_SAMPLES,
            seed: None,
            progress_every: 10,
            callback: None,
        }
    }
}

impl GeneticConfig {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SearchError::PopulationTooSmall {
                pop_size: self.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_pct) {
            return Err(SearchError::InvalidMutationProbability {
                pct: self.mutation_pct,
            });
        }
        if self.samples == 0 {
            return Err(SearchError::InvalidSampleCount);
        }
        Termination::new(self.max_iterations, self.early_stop)?;
        Ok(())
    }

    fn termination(&self) -> Result<Termination> {
        Termination::new(self.max_iterations, self.early_stop)
    }
}

/// Fluent builder for [`GeneticConfig`].
///
/// # Example
///
/// ```rust
/// use timing_search::{EarlyStop, GeneticConfigBuilder};
///
/// let config = GeneticConfigBuilder::new()
///     .population_size(30)
///     .max_iterations(100)
///     .mutation_pct(0.3)
///     .early_stop(EarlyStop::Immediate)
///     .seed(7)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.population_size, 30);
/// ```
pub struct GeneticConfigBuilder {
    cfg: GeneticConfig,
}

impl Default for GeneticConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: GeneticConfig::default(),
        }
    }
    /// Sets the population size.
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    /// Sets the generation budget.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.cfg.max_iterations = v;
        self
    }
    /// Sets the mutation probability.
    pub fn mutation_pct(mut self, v: f64) -> Self {
        self.cfg.mutation_pct = v;
        self
    }
    /// Sets the early-stop granularity.
    pub fn early_stop(mut self, v: EarlyStop) -> Self {
        self.cfg.early_stop = v;
        self
    }
    /// Sets the number of timing samples per measurement.
    pub fn samples(mut self, v: usize) -> Self {
        self.cfg.samples = v;
        self
    }
    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets the progress logging interval.
    pub fn progress_every(mut self, v: usize) -> Self {
        self.cfg.progress_every = v;
        self
    }
    /// Sets a per-generation callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::PopulationTooSmall`,
    /// `SearchError::InvalidMutationProbability`,
    /// `SearchError::InvalidSampleCount` or `SearchError::UnboundedRun`.
    pub fn build(self) -> Result<GeneticConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Genetic search engine.
pub struct GeneticSearch<C, K = MonotonicClock> {
    oracle: TimingOracle<C, K>,
    encoding: Encoding,
    config: GeneticConfig,
}

impl<C: Comparator> GeneticSearch<C, MonotonicClock> {
    /// Engine timing `comparator` with the wall clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or the encoding
    /// length differs from the comparator's secret length.
    pub fn new(comparator: C, encoding: Encoding, config: GeneticConfig) -> Result<Self> {
        Self::with_clock(comparator, MonotonicClock::new(), encoding, config)
    }
}

impl<C: Comparator, K: Clock> GeneticSearch<C, K> {
    /// Engine timing `comparator` with `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`GeneticSearch::new`].
    pub fn with_clock(
        comparator: C,
        clock: K,
        encoding: Encoding,
        config: GeneticConfig,
    ) -> Result<Self> {
        config.validate()?;
        if encoding.length() != comparator.secret_len() {
            return Err(SearchError::LengthMismatch {
                configured: encoding.length(),
                expected: comparator.secret_len(),
            });
        }
        let oracle = TimingOracle::with_clock(comparator, clock, config.samples)?;
        Ok(Self {
            oracle,
            encoding,
            config,
        })
    }

    /// Mutable access to configuration
    pub fn config_mut(&mut self) -> &mut GeneticConfig {
        &mut self.config
    }

    /// The candidate encoding.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Run the search.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Oracle` if the comparator fails; the run is
    /// aborted. Returns a configuration error if the configuration was made
    /// invalid through [`config_mut`](Self::config_mut).
    pub fn solve(&mut self) -> Result<RunResult> {
        self.config.validate()?;
        let termination = self.config.termination()?;
        let npop = self.config.population_size;

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        log::info!(
            "GA init: length={}, alphabet={}, population={}, max_iterations={}, mutation={:.3}, early_stop={}, samples={}",
            self.encoding.length(),
            self.encoding.alphabet().size(),
            npop,
            self.config.max_iterations,
            self.config.mutation_pct,
            self.config.early_stop,
            self.config.samples
        );

        let mut population = init_population(&self.encoding, npop, &mut rng);
        let mut solution: Option<Candidate> = None;
        let mut best: Option<(Candidate, f64)> = None;
        let mut history = FitnessHistory::new();
        let mut nfev = 0usize;
        let mut nit = 0usize;
        let mut message = termination.exhausted_message();

        let mut iter = 1usize;
        while termination.allows(iter) {
            let mut scores = Vec::with_capacity(npop);
            for member in &population {
                let m = self.oracle.measure(member)?;
                nfev += 1;
                scores.push(m.fitness);
                if m.matched && solution.is_none() {
                    log::info!("GA iter {:4}: secret found: {}", iter, member);
                    solution = Some(member.clone());
                    if termination.early_stop.breaks_iteration() {
                        break;
                    }
                }
            }
            nit = iter;
            history.record(&scores);

            let energies = Array1::from_vec(scores);
            let (best_idx, best_f) = argmax(&energies);
            if best.as_ref().is_none_or(|(_, f)| best_f > *f) {
                best = Some((population[best_idx].clone(), best_f));
            }
            let avg_f = energies.mean().unwrap_or(0.0);

            if self.config.progress_every > 0 && iter % self.config.progress_every == 0 {
                log::info!(
                    "GA iter {:4}  avg={:.1}  best={:.1}  evaluations={}",
                    iter,
                    avg_f,
                    best_f,
                    nfev
                );
            }

            if let (Some(cb), Some((bx, bf))) = (self.config.callback.as_mut(), best.as_ref()) {
                let intermediate = SearchIntermediate {
                    best: bx.clone(),
                    best_fitness: *bf,
                    average: avg_f,
                    iteration_best: best_f,
                    found: solution.is_some(),
                    iter,
                };
                if let CallbackAction::Stop = cb(&intermediate) {
                    message = "Search stopped by callback".to_string();
                    break;
                }
            }

            if termination.stop_after(solution.is_some()) {
                message = format!("Secret found at iteration {}", iter);
                break;
            }

            population = self.breed(&population, &energies, &mut rng);
            iter += 1;
        }

        if let Some(ref s) = solution {
            if !message.starts_with("Secret found") {
                message = format!("{}; secret found: {}", message, s);
            }
        }
        log::info!("GA finished: {}", message);

        Ok(RunResult {
            found: solution.is_some(),
            solution,
            best,
            history,
            iterations: nit,
            evaluations: nfev,
            message,
        })
    }

    /// Select, recombine and mutate one generation of children.
    fn breed<R: Rng + ?Sized>(
        &self,
        population: &[Candidate],
        energies: &Array1<f64>,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let npop = population.len();
        let length = self.encoding.length();
        let pct = self.config.mutation_pct;
        let parents = select_roulette(energies, npop, rng);

        let mut children = Vec::with_capacity(npop);
        for pair in parents.chunks(2) {
            let p1 = &population[pair[0]];
            // odd population: the last parent pairs with the first
            let p2 = &population[pair.get(1).copied().unwrap_or(parents[0])];
            let (c1, c2) = crossover_pair(p1, p2, length, rng);
            children.push(mutate_point(c1, &self.encoding, pct, rng));
            if children.len() < npop {
                children.push(mutate_point(c2, &self.encoding, pct, rng));
            }
        }
        children
    }
}
