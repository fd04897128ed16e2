use serde::{Deserialize, Serialize};

use crate::sanitize::{ema, sanitize_seconds};

/// Correct answers faster than this share of the allotted time count as fast
const FAST_RATIO: f64 = 0.6;
const FAST_STREAK_TO_PROMOTE: u32 = 5;
const WRONG_STREAK_TO_DEMOTE: u32 = 3;
const MAX_MODIFIER: i8 = 1;
const MIN_MODIFIER: i8 = -1;

const SESSION_ACCURACY_ALPHA: f64 = 0.25;
/// Neutral starting point: no accuracy delta until answers arrive
pub const INITIAL_SESSION_ACCURACY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierChange {
    Promoted,
    Demoted,
}

/// Short-term streak tracking and the bounded ±1 tier modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub consecutive_fast: u32,
    pub consecutive_wrong: u32,
    pub tier_modifier: i8,
    pub session_accuracy: f64,
    pub attempts: u32,
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            consecutive_fast: 0,
            consecutive_wrong: 0,
            tier_modifier: 0,
            session_accuracy: INITIAL_SESSION_ACCURACY,
            attempts: 0,
        }
    }
}

impl StreakState {
    pub fn record(&mut self, correct: bool, elapsed: f64, allotted: f64) -> Option<ModifierChange> {
        self.attempts += 1;
        self.session_accuracy = ema(
            self.session_accuracy,
            if correct { 1.0 } else { 0.0 },
            SESSION_ACCURACY_ALPHA,
        );

        if correct {
            self.consecutive_wrong = 0;
            let fast = allotted > 0.0 && sanitize_seconds(elapsed) / allotted < FAST_RATIO;
            if fast {
                self.consecutive_fast += 1;
            } else {
                self.consecutive_fast = 0;
            }
        } else {
            self.consecutive_wrong += 1;
            self.consecutive_fast = 0;
        }

        if self.consecutive_fast >= FAST_STREAK_TO_PROMOTE && self.tier_modifier < MAX_MODIFIER {
            self.tier_modifier += 1;
            self.consecutive_fast = 0;
            return Some(ModifierChange::Promoted);
        }
        if self.consecutive_wrong >= WRONG_STREAK_TO_DEMOTE && self.tier_modifier > MIN_MODIFIER {
            self.tier_modifier -= 1;
            self.consecutive_wrong = 0;
            return Some(ModifierChange::Demoted);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_fast_answers_promote_once() {
        let mut state = StreakState::default();
        for i in 0..4 {
            assert_eq!(state.record(true, 1.0, 5.0), None, "early promotion at {}", i);
        }
        assert_eq!(state.record(true, 1.0, 5.0), Some(ModifierChange::Promoted));
        assert_eq!(state.tier_modifier, 1);
        assert_eq!(state.consecutive_fast, 0);

        // already at the ceiling: the streak keeps counting but nothing moves
        for _ in 0..10 {
            assert_eq!(state.record(true, 1.0, 5.0), None);
        }
        assert_eq!(state.tier_modifier, 1);
    }

    #[test]
    fn test_slow_correct_breaks_fast_streak() {
        let mut state = StreakState::default();
        for _ in 0..4 {
            state.record(true, 1.0, 5.0);
        }
        state.record(true, 4.0, 5.0);
        assert_eq!(state.consecutive_fast, 0);
        assert_eq!(state.tier_modifier, 0);
    }

    #[test]
    fn test_three_wrong_demote_once_per_streak() {
        let mut state = StreakState::default();
        state.record(false, 5.0, 5.0);
        state.record(false, 5.0, 5.0);
        assert_eq!(state.record(false, 5.0, 5.0), Some(ModifierChange::Demoted));
        assert_eq!(state.tier_modifier, -1);
        assert_eq!(state.consecutive_wrong, 0);

        for _ in 0..6 {
            state.record(false, 5.0, 5.0);
        }
        assert_eq!(state.tier_modifier, -1);
    }

    #[test]
    fn test_recovery_climbs_one_step_at_a_time() {
        let mut state = StreakState {
            tier_modifier: -1,
            ..StreakState::default()
        };
        for _ in 0..5 {
            state.record(true, 0.5, 5.0);
        }
        assert_eq!(state.tier_modifier, 0);
    }

    #[test]
    fn test_session_accuracy_ema() {
        let mut state = StreakState::default();
        state.record(true, 1.0, 5.0);
        assert!((state.session_accuracy - 0.775).abs() < 1e-12);
        state.record(false, 1.0, 5.0);
        assert!((state.session_accuracy - 0.58125).abs() < 1e-12);
        assert_eq!(state.attempts, 2);
    }

    #[test]
    fn test_zero_allotted_is_never_fast() {
        let mut state = StreakState::default();
        state.record(true, 0.0, 0.0);
        assert_eq!(state.consecutive_fast, 0);
    }
}
