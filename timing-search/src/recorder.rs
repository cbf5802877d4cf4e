use crate::result::RunResult;
use crate::{CallbackAction, CallbackFn, SearchIntermediate};
use std::cell::RefCell;
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Best-known candidate after one iteration
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    /// Iteration number
    pub iteration: usize,
    /// Best-known candidate
    pub best: String,
    /// Its fitness
    pub best_fitness: f64,
    /// Whether the secret had been matched by then
    pub found: bool,
}

/// Saves run histories as CSV files plus a text summary
#[derive(Debug)]
pub struct HistoryRecorder {
    /// Run name (used for file names)
    name: String,
    /// Output directory
    output_dir: PathBuf,
    /// Per-iteration progress filled by the callback
    progress: Rc<RefCell<Vec<ProgressRecord>>>,
}

impl HistoryRecorder {
    /// Recorder writing to the user cache `records/` directory.
    pub fn new(name: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = crate::run_recorded::records_dir()?;
        Ok(Self::with_output_dir(name, dir))
    }

    /// Recorder writing to `output_dir`.
    pub fn with_output_dir(name: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            output_dir: output_dir.into(),
            progress: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the per-iteration history CSV.
    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_history.csv", self.name))
    }

    /// Path of the best-candidate progress CSV.
    pub fn progress_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_progress.csv", self.name))
    }

    /// Path of the text summary.
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_summary.txt", self.name))
    }

    /// Create a callback that records the best-known candidate each iteration
    pub fn create_callback(&self) -> CallbackFn {
        let progress = self.progress.clone();
        Box::new(move |intermediate: &SearchIntermediate| -> CallbackAction {
            progress.borrow_mut().push(ProgressRecord {
                iteration: intermediate.iter,
                best: intermediate.best.to_string(),
                best_fitness: intermediate.best_fitness,
                found: intermediate.found,
            });
            CallbackAction::Continue
        })
    }

    /// Copy of the recorded progress rows.
    pub fn progress(&self) -> Vec<ProgressRecord> {
        self.progress.borrow().clone()
    }

    /// Write the history CSV, the progress CSV (when any rows were
    /// recorded) and the summary. Returns the history CSV path.
    pub fn save(&self, result: &RunResult) -> Result<PathBuf, Box<dyn std::error::Error>> {
        create_dir_all(&self.output_dir)?;

        let history_path = self.history_path();
        let mut file = BufWriter::new(File::create(&history_path)?);
        writeln!(file, "iteration,average,best")?;
        for point in result.history.iter() {
            writeln!(
                file,
                "{},{:.3},{:.3}",
                point.iteration, point.average, point.best
            )?;
        }
        file.flush()?;

        let progress = self.progress.borrow();
        if !progress.is_empty() {
            let mut file = BufWriter::new(File::create(self.progress_path())?);
            writeln!(file, "iteration,best,best_fitness,found")?;
            for record in progress.iter() {
                writeln!(
                    file,
                    "{},{},{:.3},{}",
                    record.iteration, record.best, record.best_fitness, record.found
                )?;
            }
            file.flush()?;
        }

        self.save_summary(result)?;
        Ok(history_path)
    }

    fn save_summary(&self, result: &RunResult) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = File::create(self.summary_path())?;
        writeln!(file, "Run: {}", self.name)?;
        writeln!(file, "Found: {}", result.found)?;
        writeln!(file, "Solution: {}", result.solution_str().unwrap_or("-"))?;
        match &result.best {
            Some((candidate, fitness)) => writeln!(file, "Best: {} ({:.3} ns)", candidate, fitness)?,
            None => writeln!(file, "Best: -")?,
        }
        writeln!(file, "Iterations: {}", result.iterations)?;
        writeln!(file, "Evaluations: {}", result.evaluations)?;
        writeln!(file, "Message: {}", result.message)?;
        Ok(())
    }
}
