//! Problem factories.
//!
//! Each factory is a pure function of the slot tier and an injected RNG. It
//! returns a [`Draft`]: the expression, the exact answer, the tag list and the
//! structural bonus count. The difficulty score is `1 + bonus` clamped to
//! [1, 5]; the time budget is attached later by the engine.
//!
//! Pools are tables of [`FactoryKind`] values rather than stored closures, so
//! no session state is captured by a generator.

pub mod arithmetic;
pub mod fractions;
pub mod pool;
pub mod signed;
pub mod themed;

pub use pool::TierPools;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{
    Expression, Problem, Tag, Tier, UnitKind, MAX_DIFFICULTY_SCORE, MIN_DIFFICULTY_SCORE,
};

/// Tenure from which fraction factories enter the mixed pools
pub const FRACTION_UNLOCK_DAYS: u32 = 5;

/// Every generator the engine can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    SignedArithmetic,
    CrossZero,
    NegativeOperand,
    Decimals,
    FractionSameDenominator,
    FractionDifferentDenominator,
    FractionMultiply,
    Tables(u32),
    Squares(u32),
    Cubes(u32),
    UnitConversion(UnitKind),
    Temperature,
}

impl FactoryKind {
    pub fn is_fraction(&self) -> bool {
        matches!(
            self,
            Self::FractionSameDenominator
                | Self::FractionDifferentDenominator
                | Self::FractionMultiply
        )
    }

    pub fn build<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> Draft {
        match *self {
            Self::Addition => arithmetic::addition(tier, rng),
            Self::Subtraction => arithmetic::subtraction(tier, rng),
            Self::Multiplication => arithmetic::multiplication(tier, rng),
            Self::Division => arithmetic::division(tier, rng),
            Self::SignedArithmetic => signed::signed_arithmetic(tier, rng),
            Self::CrossZero => signed::cross_zero(tier, rng),
            Self::NegativeOperand => signed::negative_operand(tier, rng),
            Self::Decimals => signed::decimals(tier, rng),
            Self::FractionSameDenominator => fractions::same_denominator(tier, rng),
            Self::FractionDifferentDenominator => fractions::different_denominator(tier, rng),
            Self::FractionMultiply => fractions::multiply(tier, rng),
            Self::Tables(table) => themed::tables(table, tier, rng),
            Self::Squares(max) => themed::squares(max, tier, rng),
            Self::Cubes(max) => themed::cubes(max, tier, rng),
            Self::UnitConversion(unit) => themed::unit_conversion(unit, tier, rng),
            Self::Temperature => themed::temperature(tier, rng),
        }
    }
}

/// A generated problem before a time budget is attached
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub expression: Expression,
    pub answer: f64,
    pub tags: Vec<Tag>,
    pub bonus: u8,
}

impl Draft {
    pub fn difficulty_score(&self) -> u8 {
        MIN_DIFFICULTY_SCORE
            .saturating_add(self.bonus)
            .clamp(MIN_DIFFICULTY_SCORE, MAX_DIFFICULTY_SCORE)
    }

    pub fn primary_tag(&self) -> Tag {
        self.tags.first().copied().unwrap_or(Tag::Addition)
    }

    pub fn finish(self, tier: Tier, time_allotted: f64) -> Problem {
        let difficulty_score = self.difficulty_score();
        Problem {
            expression: self.expression,
            answer: self.answer,
            tier,
            difficulty_score,
            tags: self.tags,
            time_allotted,
        }
    }
}

/// Pick one value per tier from a four-entry table
pub(crate) fn by_tier<T: Copy>(tier: Tier, table: [T; 4]) -> T {
    table[tier.index()]
}
