//! Fraction problems. Operands are left unreduced; answers are decimals
//! rounded to three places.

use rand::Rng;

use super::{by_tier, Draft};
use crate::sanitize::round3;
use crate::types::{Expression, FractionOperand, Operator, Tag, Tier};

fn denominator_bound(tier: Tier) -> i64 {
    by_tier(tier, [5, 8, 10, 12])
}

/// Proper fraction with the given denominator
fn proper<R: Rng + ?Sized>(rng: &mut R, denominator: i64) -> FractionOperand {
    FractionOperand::new(rng.gen_range(1..denominator), denominator)
}

fn fraction_draft(
    left: FractionOperand,
    op: Operator,
    right: FractionOperand,
    tags: Vec<Tag>,
    bonus: u8,
) -> Draft {
    Draft {
        expression: Expression::Fraction { left, op, right },
        answer: round3(op.apply(left.value(), right.value())),
        tags,
        bonus,
    }
}

pub fn same_denominator<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let denominator = rng.gen_range(2..=denominator_bound(tier));
    let left = proper(rng, denominator);
    let right = proper(rng, denominator);

    fraction_draft(left, Operator::Add, right, vec![Tag::Fractions, Tag::SameDenominator], 1)
}

/// Cross-multiplication is needed, hence the double bonus
pub fn different_denominator<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let bound = denominator_bound(tier);
    let first = rng.gen_range(2..=bound);
    // draw from the range minus `first`
    let mut second = rng.gen_range(2..bound);
    if second >= first {
        second += 1;
    }
    let left = proper(rng, first);
    let right = proper(rng, second);

    fraction_draft(left, Operator::Add, right, vec![Tag::Fractions, Tag::DifferentDenominator], 2)
}

pub fn multiply<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let bound = denominator_bound(tier);
    let first = rng.gen_range(2..=bound);
    let second = rng.gen_range(2..=bound);
    let left = proper(rng, first);
    let right = proper(rng, second);

    fraction_draft(left, Operator::Multiply, right, vec![Tag::Fractions, Tag::FractionMultiply], 1)
}
