//! # arith-pacer
//!
//! Adaptive question generation and difficulty pacing for timed mental
//! arithmetic practice.
//!
//! - **Tier selection** - maps slot position, tenure, aptitude, rolling
//!   accuracy and a streak modifier onto four ordered tiers, with tenure
//!   gating and a cap on consecutive Hard slots
//! - **Problem factories** - weighted per-tier pools of exact-answer
//!   generators, a session-wide fraction cap, and themed topic pools
//! - **Time allocation** - per-problem time budgets blended from static
//!   difficulty bands and the learner's trusted solve times
//! - **Weak-area injection** - a ramping chance of aiming a slot at the
//!   learner's weakest skill tag
//!
//! ## Modules
//!
//! - [`engine`] - the [`SessionEngine`] façade
//! - [`tier`] - tier selection, hard cap ring and streak modifier
//! - [`factory`] - problem factories and tier pools
//! - [`timing`] - dynamic time allocation
//! - [`tracker`] - per-tag performance and per-family session stats
//! - [`weak_area`] - weak-area injection
//! - [`config`] - engine tuning knobs
//! - [`sanitize`] - numeric clamping helpers
//! - [`types`] - problems, tags, tiers and topics
//!
//! ## Example
//!
//! ```rust
//! use arith_pacer::SessionEngine;
//!
//! let mut engine = SessionEngine::with_seed(7);
//! engine.initialize(10, 6);
//!
//! let problems = engine.generate(20);
//! for problem in &problems {
//!     let submitted = problem.answer;
//!     engine.record_answer(&problem.tags, problem.check(submitted), 2.0, problem.time_allotted);
//! }
//! assert_eq!(engine.type_stats().values().map(|s| s.attempts).sum::<u32>(), 20);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod logging;
pub mod sanitize;
pub mod tier;
pub mod timing;
pub mod tracker;
pub mod types;
pub mod weak_area;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::EngineConfig;
pub use engine::{SessionEngine, SessionReport};
pub use error::ParseError;
pub use tracker::{TagPerformance, TypeStats};
pub use types::*;
