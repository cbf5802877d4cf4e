use crate::{
    Alphabet, CallbackAction, Comparator, EarlyStop, Encoding, FnComparator, GlobalBest,
    OracleFault, Particle, ParticleSwarm, PositionEncoding, SearchError, SearchIntermediate,
    SimulatedClock, SwarmConfigBuilder, SwarmUpdate, TryFnComparator,
};
use approx::assert_relative_eq;
use ndarray::array;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use timing_targets::EarlyExit;

struct Recording {
    secret: String,
    seen: RefCell<Vec<String>>,
}

impl Comparator for Recording {
    fn secret_len(&self) -> usize {
        self.secret.chars().count()
    }

    fn compare(&self, candidate: &str) -> Result<bool, OracleFault> {
        self.seen.borrow_mut().push(candidate.to_string());
        Ok(candidate == self.secret)
    }
}

#[cfg(test)]
mod particle_tests {
    use super::*;

    #[test]
    fn test_first_evaluation_sets_personal_and_global_best() {
        let mut p = Particle::new(array![5.0], array![0.0]);
        let gbest = p.evaluate(0.0, GlobalBest::unset(1));
        assert_eq!(p.pbest_fitness, 0.0);
        assert!(gbest.is_set());
        assert_eq!(gbest.position, array![5.0]);
    }

    #[test]
    fn test_global_best_needs_strictly_greater_fitness() {
        let mut a = Particle::new(array![1.0], array![0.0]);
        let mut b = Particle::new(array![2.0], array![0.0]);
        let gbest = a.evaluate(30.0, GlobalBest::unset(1));
        let gbest = b.evaluate(30.0, gbest);
        assert_eq!(gbest.position, array![1.0]);
        let gbest = b.evaluate(31.0, gbest);
        assert_eq!(gbest.position, array![2.0]);
        assert_relative_eq!(gbest.fitness, 31.0);

        // a worse measurement keeps the personal best
        b.position = array![7.0];
        let gbest = b.evaluate(3.0, gbest);
        assert_eq!(b.pbest, array![2.0]);
        assert_relative_eq!(b.fitness, 3.0);
        assert_relative_eq!(gbest.fitness, 31.0);
    }

    #[test]
    fn test_velocity_with_zero_pull_only_decays() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut p = Particle::new(array![10.0, 3.0], array![4.0, -2.0]);
        let gbest = GlobalBest {
            position: array![100.0, 100.0],
            fitness: 1.0,
        };
        p.update_velocity(&gbest, 0.5, 0.0, 0.0, &mut rng);
        assert_relative_eq!(p.velocity[0], 2.0);
        assert_relative_eq!(p.velocity[1], -1.0);
    }

    #[test]
    fn test_velocity_pulls_toward_bests() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = Particle::new(array![10.0], array![0.0]);
        let gbest = GlobalBest {
            position: array![50.0],
            fitness: 1.0,
        };
        for _ in 0..50 {
            p.velocity = array![0.0];
            p.update_velocity(&gbest, 0.7, 2.0, 2.0, &mut rng);
            // pbest == position, so only the social term acts: v in [0, 80]
            assert!((0.0..=80.0).contains(&p.velocity[0]));
        }
    }

    #[test]
    fn test_position_clamps_at_max_without_wrapping() {
        let max = Encoding::digits(10).unwrap().max_position() as f64;
        let upper = array![max];

        let mut p = Particle::new(array![max - 1.0], array![1.0e12]);
        p.update_position(&upper);
        assert_eq!(p.position[0], max);
        assert_eq!(p.position[0], 9_999_999_999.0);

        let mut p = Particle::new(array![3.0], array![-1.0e12]);
        p.update_position(&upper);
        assert_eq!(p.position[0], 0.0);

        let mut p = Particle::new(array![3.0], array![2.4]);
        p.update_position(&upper);
        assert_eq!(p.position[0], 5.0);
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    /// Comparator matching `secret` whose cost falls with the distance of
    /// the single digit from it.
    fn closeness(secret: u32, clock: &SimulatedClock) -> FnComparator<impl Fn(&str) -> bool + use<>> {
        let tick = clock.clone();
        FnComparator::new(1, move |c: &str| {
            let d = c.chars().next().and_then(|ch| ch.to_digit(10)).unwrap_or(0);
            tick.advance(100 - 10 * d.abs_diff(secret) as u64);
            d == secret
        })
    }

    #[test]
    fn test_exact_match_is_reported() {
        let clock = SimulatedClock::new();
        let oracle = closeness(4, &clock);
        let config = SwarmConfigBuilder::new()
            .swarm_size(20)
            .max_iterations(100)
            .samples(1)
            .seed(21)
            .build()
            .expect("valid config");
        let mut pso =
            ParticleSwarm::with_clock(oracle, clock, Encoding::digits(1).unwrap(), config).unwrap();
        let report = pso.solve().unwrap();
        assert!(report.found);
        assert_eq!(report.solution_str(), Some("4"));
        // immediate stop: the last evaluation was the match
        assert!(report.evaluations <= 20 * report.iterations);
    }

    #[test]
    fn test_global_best_is_monotonic() {
        for update in [SwarmUpdate::Synchronous, SwarmUpdate::Asynchronous] {
            let clock = SimulatedClock::new();
            let tick = clock.clone();
            let oracle = EarlyExit::with_work("5821", move || tick.advance(10));
            let trace = Rc::new(RefCell::new(Vec::new()));
            let sink = trace.clone();
            let config = SwarmConfigBuilder::new()
                .swarm_size(15)
                .max_iterations(40)
                .early_stop(EarlyStop::Disabled)
                .update(update)
                .samples(1)
                .seed(8)
                .callback(Box::new(move |it: &SearchIntermediate| {
                    sink.borrow_mut().push(it.best_fitness);
                    CallbackAction::Continue
                }))
                .build()
                .expect("valid config");
            let mut pso =
                ParticleSwarm::with_clock(oracle, clock, Encoding::digits(4).unwrap(), config)
                    .unwrap();
            let report = pso.solve().unwrap();

            let trace = trace.borrow();
            assert_eq!(trace.len(), 40);
            assert!(trace.windows(2).all(|w| w[1] >= w[0]), "{update}: {trace:?}");
            assert_eq!(report.evaluations, 15 * 40);
            let (_, gbest_fitness) = report.best.expect("gbest recorded");
            assert_relative_eq!(gbest_fitness, *trace.last().unwrap());
        }
    }

    #[test]
    fn test_candidates_stay_valid() {
        for layout in [PositionEncoding::Scalar, PositionEncoding::PerSymbol] {
            let recording = Recording {
                secret: "cabbac".to_string(),
                seen: RefCell::new(Vec::new()),
            };
            let encoding = Encoding::new(Alphabet::new("abc".chars()).unwrap(), 6).unwrap();
            let config = SwarmConfigBuilder::new()
                .swarm_size(12)
                .max_iterations(25)
                .coefficients(1.5, 3.0, 3.0)
                .encoding(layout)
                .early_stop(EarlyStop::Disabled)
                .samples(1)
                .seed(31)
                .build()
                .expect("valid config");
            let mut pso =
                ParticleSwarm::with_clock(&recording, SimulatedClock::new(), encoding, config)
                    .unwrap();
            pso.solve().unwrap();

            let seen = recording.seen.borrow();
            assert_eq!(seen.len(), 12 * 25);
            for c in seen.iter() {
                assert_eq!(c.len(), 6);
                assert!(c.chars().all(|s| "abc".contains(s)), "{layout}: {c}");
            }
        }
    }

    #[test]
    fn test_per_symbol_layout_decodes_indices() {
        let oracle = FnComparator::new(3, |_: &str| false);
        let encoding = Encoding::new(Alphabet::new("abc".chars()).unwrap(), 3).unwrap();
        let config = SwarmConfigBuilder::new()
            .encoding(PositionEncoding::PerSymbol)
            .build()
            .expect("valid config");
        let pso = ParticleSwarm::with_clock(oracle, SimulatedClock::new(), encoding, config)
            .unwrap();
        assert_eq!(pso.upper_bounds(), array![2.0, 2.0, 2.0]);
        assert_eq!(pso.candidate_at(&array![2.0, 0.0, 1.0]).unwrap().as_str(), "cab");
    }

    #[test]
    fn test_per_symbol_search_finds_small_secret() {
        let clock = SimulatedClock::new();
        let tick = clock.clone();
        let oracle = EarlyExit::with_work("ba", move || tick.advance(10));
        let encoding = Encoding::new(Alphabet::new("ab".chars()).unwrap(), 2).unwrap();
        let config = SwarmConfigBuilder::new()
            .swarm_size(20)
            .max_iterations(100)
            .encoding(PositionEncoding::PerSymbol)
            .samples(1)
            .seed(13)
            .build()
            .expect("valid config");
        let mut pso = ParticleSwarm::with_clock(oracle, clock, encoding, config).unwrap();
        let report = pso.solve().unwrap();
        assert!(report.found);
        assert_eq!(report.solution_str(), Some("ba"));
    }

    #[test]
    fn test_early_stop_granularity() {
        let run = |early_stop| {
            let oracle = FnComparator::new(2, |_: &str| true);
            let config = SwarmConfigBuilder::new()
                .swarm_size(6)
                .max_iterations(4)
                .early_stop(early_stop)
                .samples(1)
                .seed(1)
                .build()
                .expect("valid config");
            let mut pso = ParticleSwarm::with_clock(
                oracle,
                SimulatedClock::new(),
                Encoding::digits(2).unwrap(),
                config,
            )
            .unwrap();
            pso.solve().unwrap()
        };
        assert_eq!(run(EarlyStop::Immediate).evaluations, 1);
        assert_eq!(run(EarlyStop::EndOfIteration).evaluations, 6);
        let full = run(EarlyStop::Disabled);
        assert_eq!(full.evaluations, 24);
        assert_eq!(full.iterations, 4);
        assert!(full.found);
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_builder_rejects_bad_values() {
        let err = SwarmConfigBuilder::new().swarm_size(0).build().err().unwrap();
        assert!(matches!(err, SearchError::PopulationTooSmall { pop_size: 0 }));

        let err = SwarmConfigBuilder::new()
            .coefficients(f64::NAN, 2.0, 2.0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::InvalidCoefficient { name: "w", .. }));

        let err = SwarmConfigBuilder::new()
            .coefficients(0.7, 2.0, f64::INFINITY)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::InvalidCoefficient { name: "c2", .. }));

        let err = SwarmConfigBuilder::new()
            .max_iterations(0)
            .early_stop(EarlyStop::Disabled)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::UnboundedRun));

        // unusual but finite coefficients are allowed
        assert!(SwarmConfigBuilder::new().coefficients(-0.5, 0.0, 7.0).build().is_ok());
    }

    #[test]
    fn test_scalar_layout_needs_exact_positions() {
        let oracle = FnComparator::new(19, |_: &str| false);
        let config = SwarmConfigBuilder::new().build().expect("valid config");
        let err = ParticleSwarm::new(&oracle, Encoding::digits(19).unwrap(), config)
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::PositionNotExact { .. }));

        let config = SwarmConfigBuilder::new()
            .encoding(PositionEncoding::PerSymbol)
            .build()
            .expect("valid config");
        assert!(ParticleSwarm::new(&oracle, Encoding::digits(19).unwrap(), config).is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let oracle = FnComparator::new(4, |_: &str| false);
        let config = SwarmConfigBuilder::new().build().expect("valid config");
        let err = ParticleSwarm::new(oracle, Encoding::digits(5).unwrap(), config)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SearchError::LengthMismatch {
                configured: 5,
                expected: 4
            }
        ));
    }

    #[test]
    fn test_oracle_fault_aborts_run() {
        let calls = Cell::new(0usize);
        let oracle = TryFnComparator::new(3, |_: &str| -> Result<bool, OracleFault> {
            calls.set(calls.get() + 1);
            if calls.get() == 7 {
                Err("timeout".into())
            } else {
                Ok(false)
            }
        });
        let config = SwarmConfigBuilder::new()
            .swarm_size(5)
            .samples(1)
            .seed(2)
            .build()
            .expect("valid config");
        let mut pso = ParticleSwarm::with_clock(
            oracle,
            SimulatedClock::new(),
            Encoding::digits(3).unwrap(),
            config,
        )
        .unwrap();
        let err = pso.solve().unwrap_err();
        assert!(err.is_oracle_error());
        assert_eq!(calls.get(), 7);
    }
}
