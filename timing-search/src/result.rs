use crate::encoding::Candidate;
use serde::Serialize;

/// Per-iteration fitness statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitnessHistory {
    /// Mean fitness of the members evaluated in each iteration.
    pub average: Vec<f64>,
    /// Highest fitness seen in each iteration.
    pub best: Vec<f64>,
}

/// One row of a [`FitnessHistory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    /// 1-based iteration index.
    pub iteration: usize,
    /// Mean fitness in that iteration.
    pub average: f64,
    /// Best fitness in that iteration.
    pub best: f64,
}

impl FitnessHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one iteration.
    pub fn push(&mut self, average: f64, best: f64) {
        self.average.push(average);
        self.best.push(best);
    }

    /// Record the statistics of a batch of fitness values. Empty batches are
    /// skipped.
    pub(crate) fn record(&mut self, fitness: &[f64]) {
        if fitness.is_empty() {
            return;
        }
        let sum: f64 = fitness.iter().sum();
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        self.push(sum / fitness.len() as f64, best);
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.average.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.average.is_empty()
    }

    /// Iterate over the recorded rows. Every call starts from the first row.
    pub fn iter(&self) -> impl Iterator<Item = HistoryPoint> + '_ {
        self.average
            .iter()
            .zip(self.best.iter())
            .enumerate()
            .map(|(i, (&average, &best))| HistoryPoint {
                iteration: i + 1,
                average,
                best,
            })
    }
}

/// Outcome of a search run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// The matched secret, when found.
    pub solution: Option<Candidate>,
    /// Whether the comparator ever confirmed a match.
    pub found: bool,
    /// Highest-fitness candidate seen, with its fitness.
    pub best: Option<(Candidate, f64)>,
    /// Fitness statistics per iteration.
    pub history: FitnessHistory,
    /// Completed iterations, including one cut short by early stop.
    pub iterations: usize,
    /// Timing-oracle measurements (or raw comparisons for brute force).
    pub evaluations: usize,
    /// Stop reason.
    pub message: String,
}

impl RunResult {
    /// The matched secret as a string slice.
    pub fn solution_str(&self) -> Option<&str> {
        self.solution.as_ref().map(Candidate::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_and_iterate() {
        let mut h = FitnessHistory::new();
        h.record(&[1.0, 2.0, 6.0]);
        h.record(&[]);
        h.push(4.0, 5.0);
        assert_eq!(h.len(), 2);

        let rows: Vec<HistoryPoint> = h.iter().collect();
        assert_eq!(rows[0].iteration, 1);
        assert_relative_eq!(rows[0].average, 3.0);
        assert_relative_eq!(rows[0].best, 6.0);
        assert_eq!(rows[1].iteration, 2);

        // restartable
        assert_eq!(h.iter().count(), 2);
        assert_eq!(h.iter().count(), 2);
    }

    #[test]
    fn test_run_result_serializes() {
        let enc = crate::Encoding::digits(2).unwrap();
        let c = enc.parse("42").unwrap();
        let r = RunResult {
            solution: Some(c.clone()),
            found: true,
            best: Some((c, 12.5)),
            history: FitnessHistory::new(),
            iterations: 1,
            evaluations: 7,
            message: "Secret found".into(),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["solution"], "42");
        assert_eq!(json["found"], true);
        assert_eq!(json["best"][1], 12.5);
        assert_eq!(r.solution_str(), Some("42"));
    }
}
