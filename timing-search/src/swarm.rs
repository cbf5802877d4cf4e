//! Particle-swarm search over numeric candidate positions.
//!
//! Particles move through `[0, max_position]` (or one `[0, alphabet-1]`
//! dimension per symbol). Every position is decoded to a candidate and timed
//! once per iteration. The global best is engine state: it is handed to each
//! particle's evaluation step and returned, possibly replaced.

use crate::clamp_position::apply_clamp;
use crate::clock::{Clock, MonotonicClock};
use crate::encoding::{Candidate, Encoding};
use crate::error::{Result, SearchError};
use crate::init_random::{init_positions, init_velocities};
use crate::oracle::Comparator;
use crate::result::{FitnessHistory, RunResult};
use crate::termination::{EarlyStop, Termination};
use crate::timing::TimingOracle;
use crate::{CallbackAction, CallbackFn, SearchIntermediate};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Scalar positions above this are not exactly representable in `f64`.
pub const MAX_EXACT_POSITION: u64 = 1 << 53;

/// Timing samples per measurement used by the swarm by default.
pub const SWARM_SAMPLES: usize = 25;

/// How candidates map onto particle coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionEncoding {
    /// One dimension holding the candidate's numeric position.
    #[default]
    Scalar,
    /// One dimension per symbol holding its alphabet index.
    PerSymbol,
}

impl fmt::Display for PositionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionEncoding::Scalar => f.write_str("scalar"),
            PositionEncoding::PerSymbol => f.write_str("per-symbol"),
        }
    }
}

impl FromStr for PositionEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scalar" | "numeric" => Ok(PositionEncoding::Scalar),
            "per-symbol" | "per_symbol" | "persymbol" | "symbol" => {
                Ok(PositionEncoding::PerSymbol)
            }
            _ => Err(format!("unknown position encoding: {}", s)),
        }
    }
}

/// When particles move relative to the evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwarmUpdate {
    /// Evaluate every particle, then move all of them with the final gbest.
    #[default]
    Synchronous,
    /// Move each particle right after its own evaluation.
    Asynchronous,
}

impl fmt::Display for SwarmUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmUpdate::Synchronous => f.write_str("synchronous"),
            SwarmUpdate::Asynchronous => f.write_str("asynchronous"),
        }
    }
}

impl FromStr for SwarmUpdate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "synchronous" | "sync" => Ok(SwarmUpdate::Synchronous),
            "asynchronous" | "async" => Ok(SwarmUpdate::Asynchronous),
            _ => Err(format!("unknown swarm update: {}", s)),
        }
    }
}

/// Best position the swarm has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalBest {
    /// Position coordinates.
    pub position: Array1<f64>,
    /// Fitness at that position; `-inf` until the first evaluation.
    pub fitness: f64,
}

impl GlobalBest {
    /// A best that any measured fitness replaces.
    pub fn unset(dim: usize) -> Self {
        Self {
            position: Array1::zeros(dim),
            fitness: f64::NEG_INFINITY,
        }
    }

    /// True once a particle has been evaluated.
    pub fn is_set(&self) -> bool {
        self.fitness > f64::NEG_INFINITY
    }
}

/// One swarm member.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Array1<f64>,
    /// Current velocity.
    pub velocity: Array1<f64>,
    /// Best position this particle has visited.
    pub pbest: Array1<f64>,
    /// Fitness at `pbest`; `-inf` before the first evaluation.
    pub pbest_fitness: f64,
    /// Last measured fitness.
    pub fitness: f64,
}

impl Particle {
    /// Particle at `position` moving with `velocity`.
    pub fn new(position: Array1<f64>, velocity: Array1<f64>) -> Self {
        Self {
            pbest: position.clone(),
            position,
            velocity,
            pbest_fitness: f64::NEG_INFINITY,
            fitness: 0.0,
        }
    }

    /// Record `fitness` measured at the current position, update the
    /// personal best, and return `gbest` or its replacement.
    ///
    /// The global best is replaced only by a strictly greater fitness.
    pub fn evaluate(&mut self, fitness: f64, gbest: GlobalBest) -> GlobalBest {
        self.fitness = fitness;
        if fitness > self.pbest_fitness {
            self.pbest.assign(&self.position);
            self.pbest_fitness = fitness;
        }
        if self.pbest_fitness > gbest.fitness {
            return GlobalBest {
                position: self.pbest.clone(),
                fitness: self.pbest_fitness,
            };
        }
        gbest
    }

    /// `v' = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)` with `r1, r2` drawn
    /// from `[0, 1]` for every dimension.
    pub fn update_velocity<R: Rng + ?Sized>(
        &mut self,
        gbest: &GlobalBest,
        w: f64,
        c1: f64,
        c2: f64,
        rng: &mut R,
    ) {
        for j in 0..self.velocity.len() {
            let r1: f64 = rng.random_range(0.0..=1.0);
            let r2: f64 = rng.random_range(0.0..=1.0);
            let x = self.position[j];
            self.velocity[j] = w * self.velocity[j]
                + c1 * r1 * (self.pbest[j] - x)
                + c2 * r2 * (gbest.position[j] - x);
        }
    }

    /// `x' = clamp(round(x + v'), 0, upper)` per dimension.
    pub fn update_position(&mut self, upper: &Array1<f64>) {
        self.position += &self.velocity;
        apply_clamp(&mut self.position, upper);
    }
}

/// Configuration for [`ParticleSwarm`].
pub struct SwarmConfig {
    /// Number of particles.
    pub swarm_size: usize,
    /// Iteration budget; `0` runs until early stop fires.
    pub max_iterations: usize,
    /// Inertia weight.
    pub w: f64,
    /// Cognitive weight (pull toward the personal best).
    pub c1: f64,
    /// Social weight (pull toward the global best).
    pub c2: f64,
    /// Coordinate layout.
    pub encoding: PositionEncoding,
    /// Move timing relative to evaluation.
    pub update: SwarmUpdate,
    /// Early-stop granularity.
    pub early_stop: EarlyStop,
    /// Timing samples per measurement.
    pub samples: usize,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Log progress every this many iterations (`0` disables).
    pub progress_every: usize,
    /// Optional per-iteration callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            max_iterations: 10_000,
            w: 0.7,
            c1: 2.0,
            c2: 2.0,
            encoding: PositionEncoding::default(),
            update: SwarmUpdate::default(),
            early_stop: EarlyStop::Immediate,
            samples: SWARM_SAMPLES,
            seed: None,
            progress_every: 500,
            callback: None,
        }
    }
}

impl SwarmConfig {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn validate(&self) -> Result<()> {
        if self.swarm_size == 0 {
            return Err(SearchError::PopulationTooSmall {
                pop_size: self.swarm_size,
            });
        }
        for (name, value) in [("w", self.w), ("c1", self.c1), ("c2", self.c2)] {
            if !value.is_finite() {
                return Err(SearchError::InvalidCoefficient { name, value });
            }
        }
        if self.samples == 0 {
            return Err(SearchError::InvalidSampleCount);
        }
        Termination::new(self.max_iterations, self.early_stop)?;
        Ok(())
    }
}

/// Fluent builder for [`SwarmConfig`].
///
/// # Example
///
/// ```rust
/// use timing_search::{PositionEncoding, SwarmConfigBuilder, SwarmUpdate};
///
/// let config = SwarmConfigBuilder::new()
///     .swarm_size(40)
///     .max_iterations(500)
///     .coefficients(0.5, 1.5, 1.5)
///     .encoding(PositionEncoding::PerSymbol)
///     .update(SwarmUpdate::Asynchronous)
///     .seed(3)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.swarm_size, 40);
/// ```
pub struct SwarmConfigBuilder {
    cfg: SwarmConfig,
}

impl Default for SwarmConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SwarmConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: SwarmConfig::default(),
        }
    }
    /// Sets the number of particles.
    pub fn swarm_size(mut self, v: usize) -> Self {
        self.cfg.swarm_size = v;
        self
    }
    /// Sets the iteration budget.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.cfg.max_iterations = v;
        self
    }
    /// Sets inertia, cognitive and social weights.
    pub fn coefficients(mut self, w: f64, c1: f64, c2: f64) -> Self {
        self.cfg.w = w;
        self.cfg.c1 = c1;
        self.cfg.c2 = c2;
        self
    }
    /// Sets the coordinate layout.
    pub fn encoding(mut self, v: PositionEncoding) -> Self {
        self.cfg.encoding = v;
        self
    }
    /// Sets when particles move.
    pub fn update(mut self, v: SwarmUpdate) -> Self {
        self.cfg.update = v;
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
    /// Sets a per-iteration callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::PopulationTooSmall`,
    /// `SearchError::InvalidCoefficient`, `SearchError::InvalidSampleCount`
    /// or `SearchError::UnboundedRun`.
    pub fn build(self) -> Result<SwarmConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Particle-swarm search engine.
pub struct ParticleSwarm<C, K = MonotonicClock> {
    oracle: TimingOracle<C, K>,
    encoding: Encoding,
    config: SwarmConfig,
}

impl<C: Comparator> ParticleSwarm<C, MonotonicClock> {
    /// Engine timing `comparator` with the wall clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid, the encoding
    /// length differs from the comparator's secret length, or scalar
    /// positions exceed [`MAX_EXACT_POSITION`].
    pub fn new(comparator: C, encoding: Encoding, config: SwarmConfig) -> Result<Self> {
        Self::with_clock(comparator, MonotonicClock::new(), encoding, config)
    }
}

impl<C: Comparator, K: Clock> ParticleSwarm<C, K> {
    /// Engine timing `comparator` with `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`ParticleSwarm::new`].
    pub fn with_clock(
        comparator: C,
        clock: K,
        encoding: Encoding,
        config: SwarmConfig,
    ) -> Result<Self> {
        config.validate()?;
        if encoding.length() != comparator.secret_len() {
            return Err(SearchError::LengthMismatch {
                configured: encoding.length(),
                expected: comparator.secret_len(),
            });
        }
        check_encoding(&encoding, config.encoding)?;
        let oracle = TimingOracle::with_clock(comparator, clock, config.samples)?;
        Ok(Self {
            oracle,
            encoding,
            config,
        })
    }

    /// Mutable access to configuration
    pub fn config_mut(&mut self) -> &mut SwarmConfig {
        &mut self.config
    }

    /// The candidate encoding.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Upper bound of each coordinate.
    pub fn upper_bounds(&self) -> Array1<f64> {
        match self.config.encoding {
            PositionEncoding::Scalar => Array1::from_elem(1, self.encoding.max_position() as f64),
            PositionEncoding::PerSymbol => Array1::from_elem(
                self.encoding.length(),
                (self.encoding.alphabet().size() - 1) as f64,
            ),
        }
    }

    /// Decode a clamped position into a candidate.
    ///
    /// # Errors
    ///
    /// Returns an encoding error if a coordinate lies outside its bounds.
    pub fn candidate_at(&self, position: &Array1<f64>) -> Result<Candidate> {
        match self.config.encoding {
            PositionEncoding::Scalar => self.encoding.to_symbolic(position[0] as u64),
            PositionEncoding::PerSymbol => {
                let indices: Vec<usize> = position.iter().map(|&x| x as usize).collect();
                self.encoding.from_indices(&indices)
            }
        }
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
        check_encoding(&self.encoding, self.config.encoding)?;
        let termination = Termination::new(self.config.max_iterations, self.config.early_stop)?;
        let npop = self.config.swarm_size;
        let (w, c1, c2) = (self.config.w, self.config.c1, self.config.c2);
        let upper = self.upper_bounds();
        let n = upper.len();

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        log::info!(
            "PSO init: length={}, alphabet={}, swarm={}, max_iterations={}, w={}, c1={}, c2={}, encoding={}, update={}, early_stop={}, samples={}",
            self.encoding.length(),
            self.encoding.alphabet().size(),
            npop,
            self.config.max_iterations,
            w,
            c1,
            c2,
            self.config.encoding,
            self.config.update,
            self.config.early_stop,
            self.config.samples
        );

        let positions = init_positions(npop, &upper, &mut rng);
        let velocities = init_velocities(npop, n, &mut rng);
        let mut particles: Vec<Particle> = (0..npop)
            .map(|i| Particle::new(positions.row(i).to_owned(), velocities.row(i).to_owned()))
            .collect();

        let mut gbest = GlobalBest::unset(n);
        let mut solution: Option<Candidate> = None;
        let mut history = FitnessHistory::new();
        let mut nfev = 0usize;
        let mut nit = 0usize;
        let mut message = termination.exhausted_message();
        let asynchronous = matches!(self.config.update, SwarmUpdate::Asynchronous);

        let mut iter = 1usize;
        while termination.allows(iter) {
            let mut scores = Vec::with_capacity(npop);
            for particle in particles.iter_mut() {
                let candidate = self.candidate_at(&particle.position)?;
                let m = self.oracle.measure(&candidate)?;
                nfev += 1;
                scores.push(m.fitness);
                gbest = particle.evaluate(m.fitness, gbest);
                if m.matched && solution.is_none() {
                    log::info!("PSO iter {:4}: secret found: {}", iter, candidate);
                    solution = Some(candidate);
                    if termination.early_stop.breaks_iteration() {
                        break;
                    }
                }
                if asynchronous {
                    particle.update_velocity(&gbest, w, c1, c2, &mut rng);
                    particle.update_position(&upper);
                }
            }
            nit = iter;
            history.record(&scores);

            let avg_f = scores.iter().sum::<f64>() / scores.len().max(1) as f64;
            let iter_best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            if self.config.progress_every > 0 && iter % self.config.progress_every == 0 {
                log::info!(
                    "PSO iter {:4}  gbest={:.1}  avg={:.1}  evaluations={}",
                    iter,
                    gbest.fitness,
                    avg_f,
                    nfev
                );
            }

            if self.config.callback.is_some() {
                let intermediate = SearchIntermediate {
                    best: self.candidate_at(&gbest.position)?,
                    best_fitness: gbest.fitness,
                    average: avg_f,
                    iteration_best: iter_best,
                    found: solution.is_some(),
                    iter,
                };
                if let Some(cb) = self.config.callback.as_mut() {
                    if let CallbackAction::Stop = cb(&intermediate) {
                        message = "Search stopped by callback".to_string();
                        break;
                    }
                }
            }

            if termination.stop_after(solution.is_some()) {
                message = format!("Secret found at iteration {}", iter);
                break;
            }

            if !asynchronous {
                for particle in particles.iter_mut() {
                    particle.update_velocity(&gbest, w, c1, c2, &mut rng);
                    particle.update_position(&upper);
                }
            }
            iter += 1;
        }

        if let Some(ref s) = solution {
            if !message.starts_with("Secret found") {
                message = format!("{}; secret found: {}", message, s);
            }
        }
        log::info!("PSO finished: {}", message);

        let best = if gbest.is_set() {
            Some((self.candidate_at(&gbest.position)?, gbest.fitness))
        } else {
            None
        };

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
}

fn check_encoding(encoding: &Encoding, layout: PositionEncoding) -> Result<()> {
    if layout == PositionEncoding::Scalar && encoding.max_position() > MAX_EXACT_POSITION {
        return Err(SearchError::PositionNotExact {
            max_position: encoding.max_position(),
        });
    }
    Ok(())
}
