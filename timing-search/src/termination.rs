use crate::error::{Result, SearchError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// When a run ends after the secret has been matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EarlyStop {
    /// Keep going until the iteration budget is spent.
    Disabled,
    /// Finish evaluating the current iteration, then stop.
    EndOfIteration,
    /// Stop scanning members as soon as one match is confirmed.
    Immediate,
}

impl EarlyStop {
    /// True unless early stopping is disabled.
    pub fn is_enabled(self) -> bool {
        !matches!(self, EarlyStop::Disabled)
    }

    /// Whether a confirmed match cuts the current iteration short.
    pub fn breaks_iteration(self) -> bool {
        matches!(self, EarlyStop::Immediate)
    }
}

impl fmt::Display for EarlyStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EarlyStop::Disabled => "disabled",
            EarlyStop::EndOfIteration => "end-of-iteration",
            EarlyStop::Immediate => "immediate",
        };
        f.write_str(s)
    }
}

impl FromStr for EarlyStop {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "disabled" | "off" | "none" | "false" => Ok(EarlyStop::Disabled),
            "end-of-iteration" | "end_of_iteration" | "endofiteration" | "iteration" => {
                Ok(EarlyStop::EndOfIteration)
            }
            "immediate" | "on" | "true" => Ok(EarlyStop::Immediate),
            _ => Err(format!("unknown early stop mode: {}", s)),
        }
    }
}

/// Iteration budget plus early-stop policy shared by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    /// Iteration budget; `0` runs until the stop condition fires.
    pub max_iterations: usize,
    /// Early-stop granularity.
    pub early_stop: EarlyStop,
}

impl Termination {
    /// Validated policy.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::UnboundedRun` when `max_iterations == 0` and
    /// early stopping is disabled: such a run would never end.
    pub fn new(max_iterations: usize, early_stop: EarlyStop) -> Result<Self> {
        if max_iterations == 0 && !early_stop.is_enabled() {
            return Err(SearchError::UnboundedRun);
        }
        Ok(Self {
            max_iterations,
            early_stop,
        })
    }

    /// True when no iteration budget applies.
    pub fn is_unbounded(&self) -> bool {
        self.max_iterations == 0
    }

    /// Whether iteration `iter` (1-based) may start.
    pub fn allows(&self, iter: usize) -> bool {
        self.is_unbounded() || iter <= self.max_iterations
    }

    /// Whether the run ends after an iteration in which a match was seen.
    pub fn stop_after(&self, found: bool) -> bool {
        found && self.early_stop.is_enabled()
    }

    /// Human readable reason for a run that ran out of budget.
    pub(crate) fn exhausted_message(&self) -> String {
        format!("Maximum iterations reached: {}", self.max_iterations)
    }
}
