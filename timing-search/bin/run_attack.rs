use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Instant;
use timing_search::{
    Alphabet, BruteForceConfig, EarlyStop, Encoding, GeneticConfigBuilder, HistoryRecorder,
    PositionEncoding, RunResult, SearchError, SwarmConfigBuilder, SwarmUpdate, brute_force,
    genetic_search, particle_swarm,
};
use timing_targets::{AnyTarget, DEFAULT_SECRET, Spin, TargetKind, get_target_metadata};

#[derive(Parser, Debug)]
#[command(
    name = "run_attack",
    about = "Recover a secret from a leaky comparator by timing it"
)]
struct Cli {
    /// Search algorithm
    #[arg(long, value_enum, default_value_t = AlgorithmChoice::Ga)]
    algorithm: AlgorithmChoice,

    /// Comparator under attack (use --list-targets to see available options)
    #[arg(long, default_value = "early-exit")]
    target: String,

    /// Secret guarded by the target
    #[arg(long, default_value = DEFAULT_SECRET)]
    secret: String,

    /// Candidate alphabet
    #[arg(long, default_value = "0123456789")]
    alphabet: String,

    /// Population (GA) or swarm (PSO) size; defaults to 50 for GA and 100 for PSO
    #[arg(long)]
    population: Option<usize>,

    /// Iteration budget (0 = until the secret is found); defaults to 200 for GA and 10000 for PSO
    #[arg(long)]
    iterations: Option<usize>,

    /// GA mutation probability in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    mutation: f64,

    /// PSO inertia weight
    #[arg(long, default_value_t = 0.7)]
    w: f64,

    /// PSO cognitive weight
    #[arg(long, default_value_t = 2.0)]
    c1: f64,

    /// PSO social weight
    #[arg(long, default_value_t = 2.0)]
    c2: f64,

    /// PSO coordinate layout
    #[arg(long, value_enum, default_value_t = EncodingChoice::Scalar)]
    encoding: EncodingChoice,

    /// PSO move timing
    #[arg(long, value_enum, default_value_t = UpdateChoice::Synchronous)]
    update: UpdateChoice,

    /// Early-stop granularity; defaults to end-of-iteration for GA, immediate for PSO and disabled for brute force
    #[arg(long, value_enum)]
    early_stop: Option<EarlyStopChoice>,

    /// Timing samples per candidate; defaults to 10 for GA and 25 for PSO
    #[arg(long)]
    samples: Option<usize>,

    /// Busy-loop iterations charged per inspected symbol
    #[arg(long, default_value_t = 1000)]
    spin: u32,

    /// Maximum candidates tried by the brute-force baseline
    #[arg(long)]
    limit: Option<u64>,

    /// Optional random seed; trial `i` uses `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent runs to tabulate
    #[arg(long, default_value_t = 1)]
    trials: usize,

    /// Log progress every N iterations (0 = never)
    #[arg(long, default_value_t = 10)]
    progress_every: usize,

    /// Save each run's history under this name
    #[arg(long)]
    record: Option<String>,

    /// Directory for recorded histories (defaults to the user cache directory)
    #[arg(long)]
    record_dir: Option<PathBuf>,

    /// Print each run result as JSON
    #[arg(long)]
    json: bool,

    /// List all available targets and exit
    #[arg(long)]
    list_targets: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmChoice {
    Ga,
    Pso,
    BruteForce,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EncodingChoice {
    Scalar,
    PerSymbol,
}

impl From<EncodingChoice> for PositionEncoding {
    fn from(choice: EncodingChoice) -> Self {
        match choice {
            EncodingChoice::Scalar => PositionEncoding::Scalar,
            EncodingChoice::PerSymbol => PositionEncoding::PerSymbol,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UpdateChoice {
    Synchronous,
    Asynchronous,
}

impl From<UpdateChoice> for SwarmUpdate {
    fn from(choice: UpdateChoice) -> Self {
        match choice {
            UpdateChoice::Synchronous => SwarmUpdate::Synchronous,
            UpdateChoice::Asynchronous => SwarmUpdate::Asynchronous,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EarlyStopChoice {
    Disabled,
    EndOfIteration,
    Immediate,
}

impl From<EarlyStopChoice> for EarlyStop {
    fn from(choice: EarlyStopChoice) -> Self {
        match choice {
            EarlyStopChoice::Disabled => EarlyStop::Disabled,
            EarlyStopChoice::EndOfIteration => EarlyStop::EndOfIteration,
            EarlyStopChoice::Immediate => EarlyStop::Immediate,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    if args.list_targets {
        list_available_targets();
        return;
    }

    let kind = TargetKind::from_str(args.target.trim()).unwrap_or_else(|err| {
        eprintln!("Error: {err}. Use --list-targets to inspect available names.");
        process::exit(2);
    });

    let encoding = build_encoding(&args.alphabet, &args.secret).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(2);
    });
    if let Err(err) = encoding.parse(&args.secret) {
        eprintln!("Error: the secret is outside the search space: {err}");
        process::exit(2);
    }

    if args.trials == 0 {
        eprintln!("Error: --trials must be at least 1.");
        process::exit(2);
    }

    println!(
        "Attacking '{}' ({} symbols over {:?}) with {:?}, {} trial(s)...",
        kind,
        encoding.length(),
        args.alphabet,
        args.algorithm,
        args.trials
    );

    let mut successes = 0usize;
    let mut times = Vec::with_capacity(args.trials);
    for trial in 0..args.trials {
        let target = AnyTarget::build(kind, &args.secret, Spin(args.spin));
        let recorder = args.record.as_deref().map(|name| {
            let run_name = if args.trials > 1 {
                format!("{name}_{trial:03}")
            } else {
                name.to_string()
            };
            match &args.record_dir {
                Some(dir) => HistoryRecorder::with_output_dir(&run_name, dir),
                None => HistoryRecorder::new(&run_name).unwrap_or_else(|err| {
                    eprintln!("Error: {err}");
                    process::exit(2);
                }),
            }
        });

        let start = Instant::now();
        let result = run_trial(&args, trial, target, encoding.clone(), recorder.as_ref());
        let elapsed = start.elapsed();

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: trial {trial} failed: {e}");
                process::exit(if e.is_config_error() { 2 } else { 1 });
            }
        };
        if let Some(recorder) = &recorder {
            match recorder.save(&result) {
                Ok(path) => println!("History saved to {}", path.display()),
                Err(e) => eprintln!("Warning: failed to save history: {e}"),
            }
        }

        if result.found {
            successes += 1;
        }
        times.push(elapsed.as_secs_f64());
        print_trial(trial, &result, elapsed.as_secs_f64());
        if args.json {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Warning: failed to serialize result: {e}"),
            }
        }
    }

    let average = times.iter().sum::<f64>() / times.len() as f64;
    println!(
        "\nSuccess rate for {:?} after {} trial(s): {}/{} ({:.1}%)",
        args.algorithm,
        args.trials,
        successes,
        args.trials,
        100.0 * successes as f64 / args.trials as f64
    );
    println!("Average time: {:.3} s", average);

    if successes == 0 {
        process::exit(1);
    }
}

fn build_encoding(alphabet: &str, secret: &str) -> Result<Encoding, SearchError> {
    let alphabet = Alphabet::new(alphabet.chars())?;
    Encoding::new(alphabet, secret.chars().count())
}

fn run_trial(
    args: &Cli,
    trial: usize,
    target: AnyTarget<Spin>,
    encoding: Encoding,
    recorder: Option<&HistoryRecorder>,
) -> Result<RunResult, SearchError> {
    let seed = args.seed.map(|s| s.wrapping_add(trial as u64));
    match args.algorithm {
        AlgorithmChoice::Ga => {
            let mut builder = GeneticConfigBuilder::new()
                .mutation_pct(args.mutation)
                .progress_every(args.progress_every);
            if let Some(v) = args.population {
                builder = builder.population_size(v);
            }
            if let Some(v) = args.iterations {
                builder = builder.max_iterations(v);
            }
            if let Some(v) = args.early_stop {
                builder = builder.early_stop(v.into());
            }
            if let Some(v) = args.samples {
                builder = builder.samples(v);
            }
            if let Some(s) = seed {
                builder = builder.seed(s);
            }
            if let Some(r) = recorder {
                builder = builder.callback(r.create_callback());
            }
            genetic_search(target, encoding, builder.build()?)
        }
        AlgorithmChoice::Pso => {
            let mut builder = SwarmConfigBuilder::new()
                .coefficients(args.w, args.c1, args.c2)
                .encoding(args.encoding.into())
                .update(args.update.into())
                .progress_every(args.progress_every);
            if let Some(v) = args.population {
                builder = builder.swarm_size(v);
            }
            if let Some(v) = args.iterations {
                builder = builder.max_iterations(v);
            }
            if let Some(v) = args.early_stop {
                builder = builder.early_stop(v.into());
            }
            if let Some(v) = args.samples {
                builder = builder.samples(v);
            }
            if let Some(s) = seed {
                builder = builder.seed(s);
            }
            if let Some(r) = recorder {
                builder = builder.callback(r.create_callback());
            }
            particle_swarm(target, encoding, builder.build()?)
        }
        AlgorithmChoice::BruteForce => {
            let config = BruteForceConfig {
                limit: args.limit,
                early_stop: matches!(
                    args.early_stop,
                    Some(EarlyStopChoice::EndOfIteration | EarlyStopChoice::Immediate)
                ),
            };
            brute_force(&target, &encoding, config)
        }
    }
}

fn print_trial(trial: usize, result: &RunResult, seconds: f64) {
    let best = match &result.best {
        Some((candidate, fitness)) => format!("{candidate} ({fitness:.0} ns)"),
        None => "-".to_string(),
    };
    println!(
        "trial {:>3} | found = {:<5} | solution = {:<12} | best = {:<24} | iters = {:>6} | evals = {:>8} | {:.3} s",
        trial,
        result.found,
        result.solution_str().unwrap_or("-"),
        best,
        result.iterations,
        result.evaluations,
        seconds
    );
    println!("          {}", result.message);
}

fn list_available_targets() {
    let metadata = get_target_metadata();
    println!("Available targets ({}):", metadata.len());
    for kind in TargetKind::all() {
        if let Some(meta) = metadata.get(&kind) {
            println!(
                "- {:<15} leaky = {:<5} cost = {:<20} {}",
                kind, meta.leaky, meta.cost, meta.description
            );
        }
    }
}
