use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::sanitize::{clamp01, ema, sanitize_seconds};
use crate::types::Tag;

// ==================== Constants ====================

/// Smoothing factor of the elapsed/allotted ratio average
const TIME_RATIO_ALPHA: f64 = 0.3;

/// Smoothing factor of the correct-only solve time average
const CORRECT_TIME_ALPHA: f64 = 0.35;

/// Upper clamp of a single elapsed/allotted sample
const MAX_TIME_RATIO: f64 = 1.5;

/// Correct samples required before the solve time average is trusted
pub const TRUSTED_CORRECT_SAMPLES: u32 = 3;

const ACCURACY_WEIGHT: f64 = 0.7;
const SPEED_WEIGHT: f64 = 0.3;

/// Time ratios below this do not count as slow
const SLOW_RATIO_FLOOR: f64 = 0.5;

// ==================== TagPerformance ====================

/// Online statistics for one operation tag within a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPerformance {
    pub attempts: u32,
    pub correct: u32,
    /// Number of samples folded into `avg_correct_time`
    pub correct_samples: u32,
    /// EMA of elapsed/allotted across all attempts, in [0, 1.5]
    pub time_ratio_avg: f64,
    /// EMA of raw solve time across correct attempts only (seconds)
    pub avg_correct_time: f64,
}

impl TagPerformance {
    pub fn record(&mut self, correct: bool, elapsed: f64, allotted: f64) {
        let elapsed = sanitize_seconds(elapsed);
        let ratio = if allotted > 0.0 && allotted.is_finite() {
            (elapsed / allotted).clamp(0.0, MAX_TIME_RATIO)
        } else {
            1.0
        };

        // first sample replaces the zero prior outright
        let ratio_alpha = if self.attempts == 0 { 1.0 } else { TIME_RATIO_ALPHA };
        self.time_ratio_avg = ema(self.time_ratio_avg, ratio, ratio_alpha);
        self.attempts += 1;

        if correct {
            self.correct += 1;
            let time_alpha = if self.correct_samples == 0 {
                1.0
            } else {
                CORRECT_TIME_ALPHA
            };
            self.avg_correct_time = ema(self.avg_correct_time, elapsed, time_alpha);
            self.correct_samples += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            1.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    pub fn has_trusted_time(&self) -> bool {
        self.correct >= TRUSTED_CORRECT_SAMPLES
    }

    /// Blend of inaccuracy and slowness, always within [0, 1]
    pub fn weakness_score(&self) -> f64 {
        let slowness = clamp01(self.time_ratio_avg - SLOW_RATIO_FLOOR);
        clamp01(ACCURACY_WEIGHT * (1.0 - self.accuracy()) + SPEED_WEIGHT * slowness)
    }
}

// ==================== PerformanceTracker ====================

/// Per-tag statistics for the lifetime of one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceTracker {
    tags: HashMap<Tag, TagPerformance>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tag: Tag, correct: bool, elapsed: f64, allotted: f64) {
        self.tags.entry(tag).or_default().record(correct, elapsed, allotted);
    }

    pub fn get(&self, tag: Tag) -> Option<&TagPerformance> {
        self.tags.get(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn reset(&mut self) {
        self.tags.clear();
    }

    /// Tag with the highest weakness score; ties go to the tag sorting first
    pub fn weakest(&self) -> Option<Tag> {
        self.ranked(|_| true).map(|(tag, _)| tag)
    }

    /// Highest weakness among tags with enough attempts and above `threshold`
    pub fn weakest_qualified(&self, min_attempts: u32, threshold: f64) -> Option<(Tag, f64)> {
        self.ranked(|perf| perf.attempts >= min_attempts)
            .filter(|(_, score)| *score > threshold)
    }

    fn ranked<F>(&self, eligible: F) -> Option<(Tag, f64)>
    where
        F: Fn(&TagPerformance) -> bool,
    {
        let mut best: Option<(Tag, f64)> = None;
        for (tag, perf) in self.tags.iter().filter(|(_, p)| eligible(p)) {
            let score = perf.weakness_score();
            best = match best {
                Some((best_tag, best_score))
                    if best_score > score || (best_score == score && best_tag < *tag) =>
                {
                    Some((best_tag, best_score))
                }
                _ => Some((*tag, score)),
            };
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_replaces_average() {
        let mut perf = TagPerformance::default();
        perf.record(true, 3.0, 6.0);
        assert!((perf.time_ratio_avg - 0.5).abs() < 1e-12);
        assert!((perf.avg_correct_time - 3.0).abs() < 1e-12);
        assert_eq!(perf.correct_samples, 1);
    }

    #[test]
    fn test_ema_after_first_sample() {
        let mut perf = TagPerformance::default();
        perf.record(true, 2.0, 4.0);
        perf.record(false, 4.0, 4.0);
        // ratio: 0.5 -> 0.5 + 0.3 * (1.0 - 0.5)
        assert!((perf.time_ratio_avg - 0.65).abs() < 1e-12);
        // wrong answers leave the correct-time average untouched
        assert!((perf.avg_correct_time - 2.0).abs() < 1e-12);

        perf.record(true, 4.0, 4.0);
        assert!((perf.avg_correct_time - (2.0 + 0.35 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_is_clamped_and_zero_allotted_is_neutral() {
        let mut perf = TagPerformance::default();
        perf.record(false, 30.0, 2.0);
        assert_eq!(perf.time_ratio_avg, 1.5);

        let mut perf = TagPerformance::default();
        perf.record(false, 3.0, 0.0);
        assert_eq!(perf.time_ratio_avg, 1.0);
    }

    #[test]
    fn test_accuracy_and_trust() {
        let mut perf = TagPerformance::default();
        assert_eq!(perf.accuracy(), 1.0);
        assert!(!perf.has_trusted_time());

        perf.record(true, 1.0, 3.0);
        perf.record(true, 1.0, 3.0);
        perf.record(false, 1.0, 3.0);
        assert!(!perf.has_trusted_time());
        perf.record(true, 1.0, 3.0);
        assert!(perf.has_trusted_time());
        assert!((perf.accuracy() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_weakness_score_reference_value() {
        let perf = TagPerformance {
            attempts: 10,
            correct: 2,
            correct_samples: 2,
            time_ratio_avg: 0.9,
            avg_correct_time: 4.0,
        };
        assert!((perf.weakness_score() - 0.68).abs() < 1e-9);
    }

    #[test]
    fn test_weakness_score_bounds() {
        let untouched = TagPerformance::default();
        assert_eq!(untouched.weakness_score(), 0.0);

        let worst = TagPerformance {
            attempts: 5,
            correct: 0,
            correct_samples: 0,
            time_ratio_avg: 1.5,
            avg_correct_time: 0.0,
        };
        assert!((worst.weakness_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weakest_tag_selection() {
        let mut tracker = PerformanceTracker::new();
        assert_eq!(tracker.weakest(), None);

        for _ in 0..4 {
            tracker.record(Tag::Addition, true, 1.0, 4.0);
            tracker.record(Tag::Division, false, 4.0, 4.0);
        }
        tracker.record(Tag::Fractions, false, 5.0, 4.0);

        // a single slow miss outranks everything, but lacks the attempts to qualify
        assert_eq!(tracker.weakest(), Some(Tag::Fractions));

        let qualified = tracker.weakest_qualified(3, 0.35);
        assert_eq!(qualified.map(|(tag, _)| tag), Some(Tag::Division));
        assert!(tracker.weakest_qualified(5, 0.35).is_none());
    }
}
