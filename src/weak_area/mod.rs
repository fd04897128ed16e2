//! Weak-area injection.
//!
//! After a warm-up of five answers, each slot has a growing chance
//! (`(attempts - 5) / 50`, capped at the configured ceiling) of being
//! replaced by a problem aimed at the tag with the worst weakness score.
//! Injection silently falls through to the normal draw when no tag
//! qualifies or when the target is a fraction tag while the cap is active.

use rand::Rng;

use crate::config::EngineConfig;
use crate::factory::{Draft, FactoryKind, FRACTION_UNLOCK_DAYS};
use crate::sanitize::sanitize_param;
use crate::tracker::PerformanceTracker;
use crate::types::{Tag, Tier, Topic, UnitKind};

// ==================== Constants ====================

/// Session answers required before injection is considered
pub const WARMUP_ATTEMPTS: u32 = 5;

/// Answers over which the probability ramps to its ceiling
const RAMP_ATTEMPTS: f64 = 50.0;

/// Per-tag attempts required before a tag can be targeted
pub const MIN_TAG_ATTEMPTS: u32 = 3;

/// Weakness score a tag must exceed to be targeted
pub const WEAKNESS_THRESHOLD: f64 = 0.35;

const DEFAULT_TABLE: u32 = 7;
const DEFAULT_SQUARES_MAX: u32 = 12;
const DEFAULT_CUBES_MAX: u32 = 10;

// ==================== Tag mapping ====================

/// Factory used to remediate a tag.
///
/// With a topic selected, every tag maps into that topic's factories. In
/// mixed sessions fraction tags fall back to plain addition until fractions
/// unlock.
pub fn factory_for_tag(tag: Tag, tenure_days: u32, topic: Option<Topic>) -> FactoryKind {
    match topic {
        Some(topic) => topic_factory(tag, topic),
        None => mixed_factory(tag, tenure_days),
    }
}

fn topic_factory(tag: Tag, topic: Topic) -> FactoryKind {
    match topic {
        Topic::Tables { table } => FactoryKind::Tables(table),
        Topic::Squares { max } => FactoryKind::Squares(max),
        Topic::Cubes { max } => FactoryKind::Cubes(max),
        Topic::Units { unit } => FactoryKind::UnitConversion(unit),
        Topic::Temperature => FactoryKind::Temperature,
        Topic::Fractions => match tag {
            Tag::DifferentDenominator => FactoryKind::FractionDifferentDenominator,
            Tag::FractionMultiply => FactoryKind::FractionMultiply,
            _ => FactoryKind::FractionSameDenominator,
        },
    }
}

fn mixed_factory(tag: Tag, tenure_days: u32) -> FactoryKind {
    let fraction = |kind: FactoryKind| {
        if tenure_days >= FRACTION_UNLOCK_DAYS {
            kind
        } else {
            FactoryKind::Addition
        }
    };

    match tag {
        Tag::Addition | Tag::Carry => FactoryKind::Addition,
        Tag::Subtraction | Tag::Borrow => FactoryKind::Subtraction,
        Tag::Multiplication => FactoryKind::Multiplication,
        Tag::Division => FactoryKind::Division,
        Tag::Integers => FactoryKind::SignedArithmetic,
        Tag::NegativeOperand => FactoryKind::NegativeOperand,
        Tag::CrossZero => FactoryKind::CrossZero,
        Tag::Decimals => FactoryKind::Decimals,
        Tag::Fractions | Tag::SameDenominator => fraction(FactoryKind::FractionSameDenominator),
        Tag::DifferentDenominator => fraction(FactoryKind::FractionDifferentDenominator),
        Tag::FractionMultiply => fraction(FactoryKind::FractionMultiply),
        Tag::Tables => FactoryKind::Tables(DEFAULT_TABLE),
        Tag::Squares => FactoryKind::Squares(DEFAULT_SQUARES_MAX),
        Tag::Cubes => FactoryKind::Cubes(DEFAULT_CUBES_MAX),
        Tag::Conversion => FactoryKind::UnitConversion(UnitKind::Length),
        Tag::Temperature => FactoryKind::Temperature,
    }
}

// ==================== Injector ====================

/// Inputs describing the slot being filled
#[derive(Debug, Clone, Copy)]
pub struct SlotContext {
    pub tier: Tier,
    pub session_attempts: u32,
    pub fraction_cap_active: bool,
    pub tenure_days: u32,
    pub topic: Option<Topic>,
}

#[derive(Debug, Clone)]
pub struct WeakAreaInjector {
    ceiling: f64,
}

impl WeakAreaInjector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ceiling: sanitize_param(config.weak_area_ceiling, 0.0, 1.0, 0.35),
        }
    }

    pub fn injection_probability(&self, session_attempts: u32) -> f64 {
        if session_attempts < WARMUP_ATTEMPTS {
            return 0.0;
        }
        ((session_attempts - WARMUP_ATTEMPTS) as f64 / RAMP_ATTEMPTS).clamp(0.0, self.ceiling)
    }

    /// Tag to remediate, if any qualifies under the current cap state
    pub fn target(&self, tracker: &PerformanceTracker, fraction_cap_active: bool) -> Option<Tag> {
        let (tag, _) = tracker.weakest_qualified(MIN_TAG_ATTEMPTS, WEAKNESS_THRESHOLD)?;
        if fraction_cap_active && tag.is_fraction_family() {
            return None;
        }
        Some(tag)
    }

    /// Roll for injection and build the targeted problem on success
    pub fn try_inject<R: Rng + ?Sized>(
        &self,
        tracker: &PerformanceTracker,
        slot: &SlotContext,
        rng: &mut R,
    ) -> Option<(Tag, Draft)> {
        let probability = self.injection_probability(slot.session_attempts);
        if probability <= 0.0 || rng.gen::<f64>() >= probability {
            return None;
        }

        let tag = self.target(tracker, slot.fraction_cap_active)?;
        let kind = factory_for_tag(tag, slot.tenure_days, slot.topic);
        Some((tag, kind.build(slot.tier, rng)))
    }
}

impl Default for WeakAreaInjector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
