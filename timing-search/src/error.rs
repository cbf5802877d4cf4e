//! Error types for the timing search engines.
//!
//! Configuration problems are reported before a run starts. Oracle faults
//! abort a run and carry the comparator's own error as their source; they
//! are never replaced by a default score.

use thiserror::Error;

/// Error raised by a comparator. Propagated unmodified as the `source` of
/// [`SearchError::Oracle`].
pub type OracleFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Population or swarm size is zero.
    #[error("population size ({pop_size}) must be >= 1")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// The alphabet has no symbols.
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    /// The alphabet lists the same symbol twice.
    #[error("alphabet contains duplicate symbol {symbol:?}")]
    DuplicateSymbol {
        /// The repeated symbol
        symbol: char,
    },

    /// Candidate length is zero.
    #[error("candidate length must be >= 1")]
    ZeroLength,

    /// Configured candidate length differs from the oracle's secret length.
    #[error("length mismatch: encoding uses {configured} symbols, oracle expects {expected}")]
    LengthMismatch {
        /// Length configured on the encoding
        configured: usize,
        /// Length the comparator expects
        expected: usize,
    },

    /// `alphabet_size^length` does not fit the numeric encoding.
    #[error("search space {alphabet_size}^{length} does not fit in u64")]
    PositionSpaceOverflow {
        /// Number of symbols in the alphabet
        alphabet_size: usize,
        /// Candidate length
        length: usize,
    },

    /// Scalar swarm positions above 2^53 cannot be represented exactly.
    #[error("max position {max_position} is not exactly representable as f64")]
    PositionNotExact {
        /// The largest numeric position
        max_position: u64,
    },

    /// Mutation probability is outside [0, 1].
    #[error("invalid mutation probability: {pct} (must be in [0, 1])")]
    InvalidMutationProbability {
        /// The invalid probability
        pct: f64,
    },

    /// Timing sample count is zero.
    #[error("timing samples must be >= 1")]
    InvalidSampleCount,

    /// A swarm coefficient is NaN or infinite.
    #[error("invalid swarm coefficient {name} = {value} (must be finite)")]
    InvalidCoefficient {
        /// Coefficient name (w, c1 or c2)
        name: &'static str,
        /// The invalid value
        value: f64,
    },

    /// Unlimited iteration budget without an early stop would never end.
    #[error("max_iterations = 0 requires early stop to be enabled")]
    UnboundedRun,

    /// A string is not a valid candidate for the encoding.
    #[error("invalid candidate {candidate:?}: {reason}")]
    InvalidCandidate {
        /// The rejected string
        candidate: String,
        /// Why it was rejected
        reason: String,
    },

    /// A numeric position lies outside `[0, max_position]`.
    #[error("position {position} out of range [0, {max_position}]")]
    PositionOutOfRange {
        /// The rejected position
        position: u64,
        /// The largest valid position
        max_position: u64,
    },

    /// The comparator failed on a candidate.
    #[error("oracle failed on candidate {candidate:?}")]
    Oracle {
        /// Candidate passed to the comparator
        candidate: String,
        /// The comparator's error
        #[source]
        source: OracleFault,
    },
}

/// A specialized `Result` type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Returns `true` if this error was raised while validating a configuration.
    ///
    /// A run that fails with a configuration error never calls the oracle.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SearchError::PopulationTooSmall { .. }
                | SearchError::EmptyAlphabet
                | SearchError::DuplicateSymbol { .. }
                | SearchError::ZeroLength
                | SearchError::LengthMismatch { .. }
                | SearchError::PositionSpaceOverflow { .. }
                | SearchError::PositionNotExact { .. }
                | SearchError::InvalidMutationProbability { .. }
                | SearchError::InvalidSampleCount
                | SearchError::InvalidCoefficient { .. }
                | SearchError::UnboundedRun
        )
    }

    /// Returns `true` if the comparator itself failed.
    pub fn is_oracle_error(&self) -> bool {
        matches!(self, SearchError::Oracle { .. })
    }

    /// Returns `true` if a value could not be encoded or decoded.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidCandidate { .. } | SearchError::PositionOutOfRange { .. }
        )
    }
}
