//! Tier selection.
//!
//! Maps slot position, tenure, aptitude, rolling session accuracy and the
//! streak modifier onto one of four ordered tiers:
//!
//! ```text
//! effective = clamp01(progress + 0.3·aptitudeBoost + dayBoost + accuracyDelta + streakDelta)
//! ```
//!
//! Medium unlocks at 3 days of tenure, Hard at 7. A ring of the last five
//! chosen tiers forces Medium whenever three or more of them were Hard.

pub mod streak;

pub use streak::{ModifierChange, StreakState};

use std::collections::VecDeque;

use crate::sanitize::clamp01;
use crate::types::Tier;

// ==================== Constants ====================

pub const MEDIUM_UNLOCK_DAYS: u32 = 3;
pub const HARD_UNLOCK_DAYS: u32 = 7;

/// Tenure at which the day boost saturates
const DAY_BOOST_HORIZON: f64 = 30.0;
const DAY_BOOST_WEIGHT: f64 = 0.4;
const APTITUDE_CENTER: f64 = 5.0;
const APTITUDE_WEIGHT: f64 = 0.3;
/// Session accuracy considered on-target
const ACCURACY_TARGET: f64 = 0.7;
const ACCURACY_WEIGHT: f64 = 0.25;
const STREAK_WEIGHT: f64 = 0.15;

const VERY_EASY_BELOW: f64 = 0.25;
const EASY_BELOW: f64 = 0.50;
const MEDIUM_BELOW: f64 = 0.78;

const HARD_RING_SIZE: usize = 5;
const HARD_RING_LIMIT: usize = 3;

// ==================== Selection ====================

/// Learner signals feeding tier selection for one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierContext {
    pub tenure_days: u32,
    pub aptitude: u8,
    pub session_accuracy: f64,
    pub tier_modifier: i8,
}

pub fn effective_progress(index: usize, total: usize, ctx: &TierContext) -> f64 {
    let progress = if total == 0 {
        0.0
    } else {
        index as f64 / total as f64
    };
    let day_boost = clamp01(ctx.tenure_days as f64 / DAY_BOOST_HORIZON) * DAY_BOOST_WEIGHT;
    let aptitude_boost = (ctx.aptitude as f64 - APTITUDE_CENTER) / 10.0;
    let accuracy_delta = (ctx.session_accuracy - ACCURACY_TARGET) * ACCURACY_WEIGHT;
    let streak_delta = ctx.tier_modifier as f64 * STREAK_WEIGHT;

    clamp01(progress + aptitude_boost * APTITUDE_WEIGHT + day_boost + accuracy_delta + streak_delta)
}

pub fn tier_for_progress(effective: f64) -> Tier {
    if effective < VERY_EASY_BELOW {
        Tier::VeryEasy
    } else if effective < EASY_BELOW {
        Tier::Easy
    } else if effective < MEDIUM_BELOW {
        Tier::Medium
    } else {
        Tier::Hard
    }
}

/// Highest tier unlocked at the given tenure
pub fn max_unlocked_tier(tenure_days: u32) -> Tier {
    if tenure_days >= HARD_UNLOCK_DAYS {
        Tier::Hard
    } else if tenure_days >= MEDIUM_UNLOCK_DAYS {
        Tier::Medium
    } else {
        Tier::Easy
    }
}

/// Demote a tier to the nearest one unlocked at this tenure
pub fn gate(tier: Tier, tenure_days: u32) -> Tier {
    tier.min(max_unlocked_tier(tenure_days))
}

/// Pure tier choice for a slot, before the hard-cap ring is consulted
pub fn select_tier(index: usize, total: usize, ctx: &TierContext) -> Tier {
    gate(tier_for_progress(effective_progress(index, total, ctx)), ctx.tenure_days)
}

// ==================== Hard cap ====================

/// Ring of the last five chosen tiers
#[derive(Debug, Clone, Default)]
pub struct HardCapRing {
    recent: VecDeque<Tier>,
}

impl HardCapRing {
    pub fn new() -> Self {
        Self {
            recent: VecDeque::with_capacity(HARD_RING_SIZE),
        }
    }

    /// Record the chosen tier and return the tier to draw from.
    ///
    /// The ring keeps the pre-downgrade choice; only the returned tier is
    /// capped.
    pub fn admit(&mut self, chosen: Tier) -> Tier {
        self.recent.push_back(chosen);
        if self.recent.len() > HARD_RING_SIZE {
            self.recent.pop_front();
        }

        if chosen == Tier::Hard && self.hard_count() >= HARD_RING_LIMIT {
            chosen.easier()
        } else {
            chosen
        }
    }

    pub fn hard_count(&self) -> usize {
        self.recent.iter().filter(|t| **t == Tier::Hard).count()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(tenure_days: u32, aptitude: u8) -> TierContext {
        TierContext {
            tenure_days,
            aptitude,
            session_accuracy: ACCURACY_TARGET,
            tier_modifier: 0,
        }
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(tier_for_progress(0.0), Tier::VeryEasy);
        assert_eq!(tier_for_progress(0.249), Tier::VeryEasy);
        assert_eq!(tier_for_progress(0.25), Tier::Easy);
        assert_eq!(tier_for_progress(0.5), Tier::Medium);
        assert_eq!(tier_for_progress(0.779), Tier::Medium);
        assert_eq!(tier_for_progress(0.78), Tier::Hard);
    }

    #[test]
    fn test_effective_progress_components() {
        // tenure 15 -> day boost 0.2, aptitude 5 -> no boost, neutral accuracy
        let value = effective_progress(5, 10, &ctx(15, 5));
        assert!((value - 0.7).abs() < 1e-9);

        let boosted = TierContext {
            tier_modifier: 1,
            ..ctx(15, 5)
        };
        assert!((effective_progress(5, 10, &boosted) - 0.85).abs() < 1e-9);

        let struggling = TierContext {
            session_accuracy: 0.3,
            ..ctx(15, 5)
        };
        assert!((effective_progress(5, 10, &struggling) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_is_start_of_session() {
        assert_eq!(effective_progress(3, 0, &ctx(0, 5)), 0.0);
    }

    #[test]
    fn test_tenure_gating() {
        assert_eq!(gate(Tier::Hard, 0), Tier::Easy);
        assert_eq!(gate(Tier::Medium, 2), Tier::Easy);
        assert_eq!(gate(Tier::Hard, 3), Tier::Medium);
        assert_eq!(gate(Tier::Hard, 7), Tier::Hard);
        assert_eq!(gate(Tier::VeryEasy, 0), Tier::VeryEasy);

        // aptitude 10 at the last slot would be Hard without gating
        assert_eq!(select_tier(19, 20, &ctx(1, 10)), Tier::Easy);
        assert_eq!(select_tier(19, 20, &ctx(5, 10)), Tier::Medium);
        assert_eq!(select_tier(19, 20, &ctx(8, 10)), Tier::Hard);
    }

    #[test]
    fn test_monotonic_over_slots() {
        let context = ctx(10, 5);
        let mut previous = Tier::VeryEasy;
        for index in 0..40 {
            let tier = select_tier(index, 40, &context);
            assert!(tier >= previous, "tier regressed at slot {}", index);
            previous = tier;
        }
        assert_eq!(previous, Tier::Hard);
    }

    #[test]
    fn test_hard_cap_ring() {
        let mut ring = HardCapRing::new();
        assert_eq!(ring.admit(Tier::Hard), Tier::Hard);
        assert_eq!(ring.admit(Tier::Hard), Tier::Hard);
        // third Hard in the window is capped
        assert_eq!(ring.admit(Tier::Hard), Tier::Medium);
        assert_eq!(ring.admit(Tier::Hard), Tier::Medium);
        assert_eq!(ring.hard_count(), 4);

        // non-Hard choices pass through untouched
        assert_eq!(ring.admit(Tier::Easy), Tier::Easy);
    }

    #[test]
    fn test_hard_cap_ring_forgets_after_five() {
        let mut ring = HardCapRing::new();
        ring.admit(Tier::Hard);
        ring.admit(Tier::Hard);
        for _ in 0..5 {
            ring.admit(Tier::Medium);
        }
        assert_eq!(ring.hard_count(), 0);
        assert_eq!(ring.admit(Tier::Hard), Tier::Hard);
    }
}
