//! Session statistics.
//!
//! - [`PerformanceTracker`] feeds tier pacing, weak-area targeting and time
//!   allocation.
//! - [`SessionStats`] only backs the end-of-session report.

pub mod performance;
pub mod session_stats;

pub use performance::{PerformanceTracker, TagPerformance, TRUSTED_CORRECT_SAMPLES};
pub use session_stats::{SessionStats, TypeStats};
