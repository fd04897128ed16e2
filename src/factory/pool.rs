//! Weighted per-tier factory pools and the capped draw.
//!
//! Weighting is by repetition; draws are uniform over the pool entries.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{FactoryKind, FRACTION_UNLOCK_DAYS};
use crate::types::{Tier, Topic};

use FactoryKind::*;

const MIXED_VERY_EASY: &[FactoryKind] =
    &[Addition, Addition, Subtraction, Subtraction, Multiplication, Division];
const MIXED_EASY: &[FactoryKind] =
    &[Addition, Subtraction, Multiplication, Multiplication, Division];
const MIXED_MEDIUM: &[FactoryKind] = &[
    Addition,
    Subtraction,
    Multiplication,
    Multiplication,
    Division,
    Division,
];
const MIXED_HARD: &[FactoryKind] = &[
    Addition,
    Subtraction,
    Multiplication,
    Division,
    SignedArithmetic,
    SignedArithmetic,
    Decimals,
    Decimals,
    CrossZero,
    NegativeOperand,
];

const FRACTIONS_EASY: &[FactoryKind] = &[FractionSameDenominator];
const FRACTIONS_ADVANCED: &[FactoryKind] = &[
    FractionSameDenominator,
    FractionDifferentDenominator,
    FractionMultiply,
];

#[derive(Debug, Clone)]
pub struct TierPools {
    pools: [Vec<FactoryKind>; 4],
    /// Themed pools, fractions included, ignore the fraction cap
    cap_exempt: bool,
}

impl TierPools {
    pub fn build(tenure_days: u32, topic: Option<Topic>) -> Self {
        match topic {
            None => Self::mixed(tenure_days),
            Some(topic) => Self::themed(topic),
        }
    }

    fn mixed(tenure_days: u32) -> Self {
        let fractions = tenure_days >= FRACTION_UNLOCK_DAYS;
        let with = |base: &[FactoryKind], extra: &[FactoryKind]| {
            let mut pool = base.to_vec();
            if fractions {
                pool.extend_from_slice(extra);
            }
            pool
        };

        Self {
            pools: [
                MIXED_VERY_EASY.to_vec(),
                with(MIXED_EASY, FRACTIONS_EASY),
                with(MIXED_MEDIUM, FRACTIONS_ADVANCED),
                with(MIXED_HARD, FRACTIONS_ADVANCED),
            ],
            cap_exempt: false,
        }
    }

    fn themed(topic: Topic) -> Self {
        let single = |kind: FactoryKind| -> [Vec<FactoryKind>; 4] {
            [vec![kind], vec![kind], vec![kind], vec![kind]]
        };

        match topic {
            Topic::Tables { table } => Self::exempt(single(Tables(table))),
            Topic::Squares { max } => Self::exempt(single(Squares(max))),
            Topic::Cubes { max } => Self::exempt(single(Cubes(max))),
            Topic::Units { unit } => Self::exempt(single(UnitConversion(unit))),
            Topic::Temperature => Self::exempt(single(Temperature)),
            Topic::Fractions => Self::exempt([
                FRACTIONS_EASY.to_vec(),
                FRACTIONS_EASY.to_vec(),
                FRACTIONS_ADVANCED.to_vec(),
                FRACTIONS_ADVANCED.to_vec(),
            ]),
        }
    }

    fn exempt(pools: [Vec<FactoryKind>; 4]) -> Self {
        Self {
            pools,
            cap_exempt: true,
        }
    }

    pub fn pool(&self, tier: Tier) -> &[FactoryKind] {
        &self.pools[tier.index()]
    }

    pub fn is_cap_exempt(&self) -> bool {
        self.cap_exempt
    }

    /// Uniform draw from the tier's pool.
    ///
    /// While `cap_active`, a fraction draw is retried up to `max_redraws`
    /// times; if every retry is a fraction too, the last one is accepted.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        tier: Tier,
        cap_active: bool,
        max_redraws: u32,
        rng: &mut R,
    ) -> FactoryKind {
        let pool = self.pool(tier);
        let mut kind = pool.choose(rng).copied().unwrap_or(Addition);

        if cap_active && !self.cap_exempt {
            let mut redraws = 0;
            while kind.is_fraction() && redraws < max_redraws {
                kind = pool.choose(rng).copied().unwrap_or(Addition);
                redraws += 1;
            }
        }

        kind
    }
}
