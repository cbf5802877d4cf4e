//! Comparator implementations.

/// Constant-time comparison used as a flat-signal control.
pub mod constant_time;
/// Early-exit comparison, linear leak.
pub mod early_exit;
/// Prefix re-verifying comparison, quadratic leak.
pub mod prefix_recheck;

pub use constant_time::ConstantTime;
pub use early_exit::EarlyExit;
pub use prefix_recheck::PrefixRecheck;
