//! Vulnerable comparators used as timing oracles.
//!
//! Every target exposes `validate(&str) -> bool` and `secret_len()`. The
//! comparators differ only in how much work they do before answering, which
//! is what a timing search observes:
//!
//! - [`EarlyExit`]: returns at the first mismatching symbol (linear leak)
//! - [`PrefixRecheck`]: re-verifies the prefix at each step (quadratic leak)
//! - [`ConstantTime`]: inspects every symbol (no leak)
//!
//! Extra per-symbol cost is injected through the [`Work`] trait.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub mod targets;
pub mod work;

pub use targets::{ConstantTime, EarlyExit, PrefixRecheck};
pub use work::{Spin, Work};

/// Secret guarded by the default target.
pub const DEFAULT_SECRET: &str = "0123456789";

/// Available target kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// [`EarlyExit`]
    EarlyExit,
    /// [`PrefixRecheck`]
    PrefixRecheck,
    /// [`ConstantTime`]
    ConstantTime,
}

impl TargetKind {
    /// All kinds, in registry order.
    pub fn all() -> [TargetKind; 3] {
        [
            TargetKind::EarlyExit,
            TargetKind::PrefixRecheck,
            TargetKind::ConstantTime,
        ]
    }

    /// Canonical name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::EarlyExit => "early-exit",
            TargetKind::PrefixRecheck => "prefix-recheck",
            TargetKind::ConstantTime => "constant-time",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for TargetKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "early-exit" | "early_exit" | "earlyexit" => Ok(TargetKind::EarlyExit),
            "prefix-recheck" | "prefix_recheck" | "prefixrecheck" => {
                Ok(TargetKind::PrefixRecheck)
            }
            "constant-time" | "constant_time" | "constanttime" => Ok(TargetKind::ConstantTime),
            _ => Err(format!("unknown target: {}", s)),
        }
    }
}

/// Metadata describing a target
#[derive(Debug, Clone)]
pub struct TargetMetadata {
    /// Target kind
    pub kind: TargetKind,
    /// Description of the target
    pub description: String,
    /// Whether the comparison time depends on the candidate
    pub leaky: bool,
    /// Symbols inspected as a function of the matching prefix length `k`
    /// (secret length `n`), for a wrong candidate of the right length
    pub cost: &'static str,
}

/// Get metadata for all available targets
pub fn get_target_metadata() -> HashMap<TargetKind, TargetMetadata> {
    let mut metadata = HashMap::new();

    metadata.insert(
        TargetKind::EarlyExit,
        TargetMetadata {
            kind: TargetKind::EarlyExit,
            description: "Returns on the first mismatching symbol".to_string(),
            leaky: true,
            cost: "k + 1",
        },
    );

    metadata.insert(
        TargetKind::PrefixRecheck,
        TargetMetadata {
            kind: TargetKind::PrefixRecheck,
            description: "Re-verifies the whole prefix after every matching symbol".to_string(),
            leaky: true,
            cost: "(k + 1)(k + 2) / 2",
        },
    );

    metadata.insert(
        TargetKind::ConstantTime,
        TargetMetadata {
            kind: TargetKind::ConstantTime,
            description: "Inspects every symbol whatever the outcome".to_string(),
            leaky: false,
            cost: "n",
        },
    );

    metadata
}

/// A target chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyTarget<W = Spin> {
    /// Early-exit comparator
    EarlyExit(EarlyExit<W>),
    /// Prefix re-checking comparator
    PrefixRecheck(PrefixRecheck<W>),
    /// Constant-time comparator
    ConstantTime(ConstantTime),
}

impl<W: Work> AnyTarget<W> {
    /// Build the target of `kind` guarding `secret`.
    pub fn build(kind: TargetKind, secret: &str, work: W) -> Self {
        match kind {
            TargetKind::EarlyExit => AnyTarget::EarlyExit(EarlyExit::with_work(secret, work)),
            TargetKind::PrefixRecheck => {
                AnyTarget::PrefixRecheck(PrefixRecheck::with_work(secret, work))
            }
            TargetKind::ConstantTime => AnyTarget::ConstantTime(ConstantTime::new(secret)),
        }
    }

    /// Secret length in symbols.
    pub fn secret_len(&self) -> usize {
        match self {
            AnyTarget::EarlyExit(t) => t.secret_len(),
            AnyTarget::PrefixRecheck(t) => t.secret_len(),
            AnyTarget::ConstantTime(t) => t.secret_len(),
        }
    }

    /// Returns `true` if `candidate` equals the secret.
    pub fn validate(&self, candidate: &str) -> bool {
        match self {
            AnyTarget::EarlyExit(t) => t.validate(candidate),
            AnyTarget::PrefixRecheck(t) => t.validate(candidate),
            AnyTarget::ConstantTime(t) => t.validate(candidate),
        }
    }
}
