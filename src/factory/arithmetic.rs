//! Whole-number addition, subtraction, multiplication and division.

use rand::Rng;

use super::{by_tier, Draft};
use crate::types::{Expression, Operator, Tag, Tier};

type Range = (i64, i64);

fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): Range) -> i64 {
    rng.gen_range(lo..=hi)
}

fn sum_ranges(tier: Tier) -> (Range, Range) {
    by_tier(
        tier,
        [
            ((1, 9), (1, 9)),
            ((10, 49), (1, 20)),
            ((20, 99), (10, 99)),
            ((100, 499), (10, 199)),
        ],
    )
}

/// True when some column of `a + b` produces a carry
pub fn requires_carry(a: u64, b: u64) -> bool {
    let (mut a, mut b) = (a, b);
    while a > 0 || b > 0 {
        if a % 10 + b % 10 >= 10 {
            return true;
        }
        a /= 10;
        b /= 10;
    }
    false
}

/// True when some column of `a - b` needs a borrow; expects `a >= b`
pub fn requires_borrow(a: u64, b: u64) -> bool {
    let (mut a, mut b) = (a, b);
    while b > 0 {
        if a % 10 < b % 10 {
            return true;
        }
        a /= 10;
        b /= 10;
    }
    false
}

pub fn addition<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let (left_range, right_range) = sum_ranges(tier);
    let a = sample(rng, left_range);
    let b = sample(rng, right_range);

    let carry = requires_carry(a as u64, b as u64);
    let mut tags = vec![Tag::Addition];
    if carry {
        tags.push(Tag::Carry);
    }

    Draft {
        expression: Expression::Binary {
            left: a as f64,
            op: Operator::Add,
            right: b as f64,
        },
        answer: (a + b) as f64,
        tags,
        bonus: u8::from(carry),
    }
}

pub fn subtraction<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let (left_range, right_range) = sum_ranges(tier);
    let x = sample(rng, left_range);
    let y = sample(rng, right_range);
    let (a, b) = if x >= y { (x, y) } else { (y, x) };

    let borrow = requires_borrow(a as u64, b as u64);
    let mut tags = vec![Tag::Subtraction];
    if borrow {
        tags.push(Tag::Borrow);
    }

    Draft {
        expression: Expression::Binary {
            left: a as f64,
            op: Operator::Subtract,
            right: b as f64,
        },
        answer: (a - b) as f64,
        tags,
        bonus: u8::from(borrow),
    }
}

pub fn multiplication<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    // wide first factor, narrow single-digit-ish multiplier
    let (wide, narrow) = by_tier(
        tier,
        [((1, 5), (1, 5)), ((2, 10), (2, 9)), ((3, 12), (2, 9)), ((6, 25), (3, 9))],
    );
    let a = sample(rng, wide);
    let b = sample(rng, narrow);

    Draft {
        expression: Expression::Binary {
            left: a as f64,
            op: Operator::Multiply,
            right: b as f64,
        },
        answer: (a * b) as f64,
        tags: vec![Tag::Multiplication],
        bonus: u8::from(a >= 7 || b >= 7),
    }
}

/// Built as `divisor × quotient` so the answer is always exact
pub fn division<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let (divisors, quotients) = by_tier(
        tier,
        [((2, 5), (1, 5)), ((2, 9), (2, 10)), ((2, 12), (2, 12)), ((3, 15), (5, 20))],
    );
    let divisor = sample(rng, divisors);
    let quotient = sample(rng, quotients);

    Draft {
        expression: Expression::Binary {
            left: (divisor * quotient) as f64,
            op: Operator::Divide,
            right: divisor as f64,
        },
        answer: quotient as f64,
        tags: vec![Tag::Division],
        bonus: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn operands(draft: &Draft) -> (f64, Operator, f64) {
        match draft.expression {
            Expression::Binary { left, op, right } => (left, op, right),
            ref other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn test_carry_detection() {
        assert!(!requires_carry(12, 34));
        assert!(requires_carry(15, 7));
        assert!(requires_carry(150, 70));
        assert!(!requires_carry(0, 0));
        assert!(requires_carry(5, 5));
    }

    #[test]
    fn test_borrow_detection() {
        assert!(!requires_borrow(47, 23));
        assert!(requires_borrow(42, 7));
        assert!(requires_borrow(305, 80));
        assert!(!requires_borrow(9, 9));
    }

    #[test]
    fn test_addition_bonus_matches_carry_tag() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for tier in Tier::ALL {
            for _ in 0..200 {
                let draft = addition(tier, &mut rng);
                let (a, op, b) = operands(&draft);
                assert_eq!(op, Operator::Add);
                assert_eq!(draft.answer, a + b);
                let has_carry = draft.tags.contains(&Tag::Carry);
                assert_eq!(has_carry, draft.bonus == 1);
                assert_eq!(has_carry, requires_carry(a as u64, b as u64));
            }
        }
    }

    #[test]
    fn test_subtraction_never_goes_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for tier in Tier::ALL {
            for _ in 0..200 {
                let draft = subtraction(tier, &mut rng);
                let (a, _, b) = operands(&draft);
                assert!(a >= b);
                assert!(draft.answer >= 0.0);
                assert_eq!(draft.tags.contains(&Tag::Borrow), draft.bonus == 1);
            }
        }
    }

    #[test]
    fn test_multiplication_bonus_for_large_factors() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let draft = multiplication(Tier::Medium, &mut rng);
            let (a, _, b) = operands(&draft);
            assert_eq!(draft.answer, a * b);
            assert_eq!(draft.bonus == 1, a >= 7.0 || b >= 7.0);
        }
    }

    #[test]
    fn test_division_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for tier in Tier::ALL {
            for _ in 0..200 {
                let draft = division(tier, &mut rng);
                let (dividend, op, divisor) = operands(&draft);
                assert_eq!(op, Operator::Divide);
                assert_eq!(draft.answer * divisor, dividend);
                assert_eq!(draft.answer.fract(), 0.0);
                assert_eq!(draft.bonus, 1);
            }
        }
    }
}
