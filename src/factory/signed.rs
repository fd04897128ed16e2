//! Signed integers and quarter-unit decimals.

use rand::Rng;

use super::{by_tier, Draft};
use crate::types::{Expression, Operator, Tag, Tier};

/// Magnitude bound of signed operands per tier
fn signed_bound(tier: Tier) -> i64 {
    by_tier(tier, [5, 10, 15, 20])
}

fn add_or_subtract<R: Rng + ?Sized>(rng: &mut R) -> Operator {
    if rng.gen_bool(0.5) {
        Operator::Add
    } else {
        Operator::Subtract
    }
}

fn binary(left: i64, op: Operator, right: i64) -> Expression {
    Expression::Binary {
        left: left as f64,
        op,
        right: right as f64,
    }
}

pub fn signed_arithmetic<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let bound = signed_bound(tier);
    let a = rng.gen_range(-bound..=bound);
    let b = rng.gen_range(-bound..=bound);
    let op = add_or_subtract(rng);
    let answer = op.apply(a as f64, b as f64);

    let negative = a < 0 || b < 0;
    let mut tags = vec![Tag::Integers];
    if negative {
        tags.push(Tag::NegativeOperand);
    }

    Draft {
        expression: binary(a, op, b),
        answer,
        tags,
        bonus: u8::from(negative),
    }
}

/// `a − b` with `b > a > 0`, so the result lands below zero
pub fn cross_zero<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let bound = signed_bound(tier);
    let a = rng.gen_range(1..=bound);
    let b = rng.gen_range(a + 1..=a + bound);

    Draft {
        expression: binary(a, Operator::Subtract, b),
        answer: (a - b) as f64,
        tags: vec![Tag::Integers, Tag::CrossZero],
        bonus: 1,
    }
}

pub fn negative_operand<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let bound = signed_bound(tier);
    let a = rng.gen_range(-bound..=-1);
    let b = rng.gen_range(1..=bound);
    let op = add_or_subtract(rng);

    Draft {
        expression: binary(a, op, b),
        answer: op.apply(a as f64, b as f64),
        tags: vec![Tag::Integers, Tag::NegativeOperand],
        bonus: 1,
    }
}

/// Operands are whole quarters, which are exact in binary floating point
pub fn decimals<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let max_quarters = by_tier(tier, [8, 20, 40, 80]);
    let x = rng.gen_range(1..=max_quarters);
    let y = rng.gen_range(1..=max_quarters);
    let op = add_or_subtract(rng);
    let (a, b) = match op {
        Operator::Subtract if x < y => (y, x),
        _ => (x, y),
    };
    let (a, b) = (a as f64 / 4.0, b as f64 / 4.0);

    Draft {
        expression: Expression::Binary { left: a, op, right: b },
        answer: op.apply(a, b),
        tags: vec![Tag::Decimals],
        bonus: 1,
    }
}
