//! Dynamic time allocation.
//!
//! Blends the structural time band of a difficulty score with the learner's
//! own buffered correct-answer solve time, weighted by a trust ramp:
//!
//! ```text
//! trust  = clamp01((correct - 3) / 7)
//! result = lerp(staticMid, avgCorrectTime · buffer, weight · trust)
//! ```
//!
//! The result is soft-clamped to the band (±20%), hard-clamped to [2, 12]
//! and rounded to the nearest half second.

use crate::config::EngineConfig;
use crate::sanitize::{clamp01, finalize_time_budget, lerp};
use crate::tracker::{TagPerformance, TRUSTED_CORRECT_SAMPLES};
use crate::types::{MAX_DIFFICULTY_SCORE, MIN_DIFFICULTY_SCORE};

/// Correct samples over the trust threshold needed for full trust
const TRUST_RAMP_SAMPLES: f64 = 7.0;
const BAND_SOFT_MIN: f64 = 0.8;
const BAND_SOFT_MAX: f64 = 1.2;

/// Baseline [min, max] seconds per difficulty score 1..=5
const TIME_BANDS: [(f64, f64); 5] = [(2.0, 3.0), (3.0, 5.0), (4.0, 7.0), (6.0, 9.0), (9.0, 12.0)];

pub fn time_band(difficulty_score: u8) -> (f64, f64) {
    let score = difficulty_score.clamp(MIN_DIFFICULTY_SCORE, MAX_DIFFICULTY_SCORE);
    TIME_BANDS[(score - MIN_DIFFICULTY_SCORE) as usize]
}

/// Trust placed in a tag's solve-time telemetry, 0 until it is trusted
pub fn trust_level(perf: Option<&TagPerformance>) -> f64 {
    match perf {
        Some(p) if p.has_trusted_time() => {
            clamp01((p.correct - TRUSTED_CORRECT_SAMPLES) as f64 / TRUST_RAMP_SAMPLES)
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct TimeAllocator {
    user_timing_weight: f64,
    solve_time_buffer: f64,
}

impl TimeAllocator {
    pub fn new(config: &EngineConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            user_timing_weight: config.user_timing_weight,
            solve_time_buffer: config.solve_time_buffer,
        }
    }

    /// Time budget for a problem of `difficulty_score` whose primary tag has `perf`
    pub fn allocate(&self, difficulty_score: u8, perf: Option<&TagPerformance>) -> f64 {
        let (band_min, band_max) = time_band(difficulty_score);
        let static_mid = (band_min + band_max) / 2.0;

        let trust = trust_level(perf);
        let user_time = match perf {
            Some(p) if p.has_trusted_time() => p.avg_correct_time * self.solve_time_buffer,
            _ => static_mid,
        };

        let blended = lerp(static_mid, user_time, self.user_timing_weight * trust);
        let soft = blended.clamp(band_min * BAND_SOFT_MIN, band_max * BAND_SOFT_MAX);
        finalize_time_budget(soft)
    }
}

impl Default for TimeAllocator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
