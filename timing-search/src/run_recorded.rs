//! Recording wrappers around the search engines

use crate::recorder::HistoryRecorder;
use crate::{
    Comparator, Encoding, GeneticConfig, RunResult, SwarmConfig, genetic_search, particle_swarm,
};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the records directory using the directories crate
pub(crate) fn records_dir() -> Result<PathBuf, String> {
    let proj_dirs = ProjectDirs::from("org", "timing-search", "timing-search")
        .ok_or("Failed to determine project directories")?;

    let records_dir = proj_dirs.cache_dir().join("records");
    std::fs::create_dir_all(&records_dir)
        .map_err(|e| format!("Failed to create records directory: {}", e))?;

    Ok(records_dir)
}

/// Run a genetic search and save its history under the records directory.
///
/// A progress callback is installed unless `config` already carries one.
/// Returns the result and the history CSV path.
pub fn run_recorded_genetic_search<C: Comparator>(
    run_name: &str,
    comparator: C,
    encoding: Encoding,
    mut config: GeneticConfig,
) -> Result<(RunResult, PathBuf), Box<dyn std::error::Error>> {
    let recorder = HistoryRecorder::new(run_name)?;
    if config.callback.is_none() {
        config.callback = Some(recorder.create_callback());
    }
    let result = genetic_search(comparator, encoding, config)?;
    let csv_path = recorder.save(&result)?;
    Ok((result, csv_path))
}

/// Run a particle-swarm search and save its history under the records
/// directory.
pub fn run_recorded_particle_swarm<C: Comparator>(
    run_name: &str,
    comparator: C,
    encoding: Encoding,
    mut config: SwarmConfig,
) -> Result<(RunResult, PathBuf), Box<dyn std::error::Error>> {
    let recorder = HistoryRecorder::new(run_name)?;
    if config.callback.is_none() {
        config.callback = Some(recorder.create_callback());
    }
    let result = particle_swarm(comparator, encoding, config)?;
    let csv_path = recorder.save(&result)?;
    Ok((result, csv_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnComparator, GeneticConfigBuilder};

    #[test]
    fn test_run_recorded_genetic_search() {
        let oracle = FnComparator::new(2, |c: &str| c == "37");
        let config = GeneticConfigBuilder::new()
            .population_size(20)
            .max_iterations(5)
            .samples(1)
            .seed(42)
            .build()
            .expect("valid config");

        match run_recorded_genetic_search(
            "test_ga_two_digits",
            oracle,
            Encoding::digits(2).unwrap(),
            config,
        ) {
            Ok((result, csv_path)) => {
                assert!(result.iterations >= 1);
                let csv = std::fs::read_to_string(&csv_path).expect("history written");
                assert!(csv.starts_with("iteration,average,best"));
                assert_eq!(csv.lines().count(), result.history.len() + 1);
            }
            Err(e) => {
                panic!("Failed to run recorded genetic search: {}", e);
            }
        }
    }
}
