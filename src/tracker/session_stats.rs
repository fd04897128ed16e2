use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sanitize::sanitize_seconds;
use crate::types::Tag;

/// Additive per-family counters for the end-of-session report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    pub attempts: u32,
    pub correct: u32,
    pub total_solve_time: f64,
}

impl TypeStats {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    pub fn average_solve_time(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.total_solve_time / self.attempts as f64
        }
    }
}

/// Report-only aggregate keyed by primary tag. Never read by generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    by_type: BTreeMap<Tag, TypeStats>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, primary: Tag, correct: bool, elapsed: f64) {
        let stats = self.by_type.entry(primary).or_default();
        stats.attempts += 1;
        if correct {
            stats.correct += 1;
        }
        stats.total_solve_time += sanitize_seconds(elapsed);
    }

    pub fn snapshot(&self) -> BTreeMap<Tag, TypeStats> {
        self.by_type.clone()
    }

    pub fn reset(&mut self) {
        self.by_type.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut stats = SessionStats::new();
        stats.record(Tag::Addition, true, 2.0);
        stats.record(Tag::Addition, false, 4.0);
        stats.record(Tag::Division, true, 3.0);

        let snapshot = stats.snapshot();
        let addition = snapshot[&Tag::Addition];
        assert_eq!(addition.attempts, 2);
        assert_eq!(addition.correct, 1);
        assert!((addition.total_solve_time - 6.0).abs() < 1e-12);
        assert!((addition.accuracy() - 0.5).abs() < 1e-12);
        assert!((addition.average_solve_time() - 3.0).abs() < 1e-12);
        assert_eq!(snapshot[&Tag::Division].attempts, 1);
    }

    #[test]
    fn test_invalid_elapsed_adds_nothing() {
        let mut stats = SessionStats::new();
        stats.record(Tag::Decimals, true, f64::NAN);
        stats.record(Tag::Decimals, true, -3.0);
        assert_eq!(stats.snapshot()[&Tag::Decimals].total_solve_time, 0.0);
    }

    #[test]
    fn test_empty_type_stats() {
        let empty = TypeStats::default();
        assert_eq!(empty.accuracy(), 0.0);
        assert_eq!(empty.average_solve_time(), 0.0);
    }
}
