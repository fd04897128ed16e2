//! Topic-driven variants: times tables, squares, cubes, unit and temperature
//! conversion. Each bounds its numeric range from the topic key and the slot
//! tier, and tags the problem with its primary family followed by the topic.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{by_tier, Draft};
use crate::types::{Expression, Operator, Tag, Tier, Unit, UnitKind};

/// Factor from which a multiplication fact counts as harder
const HARD_FACTOR: i64 = 7;

pub fn tables<R: Rng + ?Sized>(table: u32, tier: Tier, rng: &mut R) -> Draft {
    let table = table.clamp(2, 20) as i64;
    let multiplier = rng.gen_range(1..=by_tier(tier, [5, 10, 12, 12]));
    let (left, right) = if rng.gen_bool(0.5) {
        (table, multiplier)
    } else {
        (multiplier, table)
    };

    Draft {
        expression: Expression::Binary {
            left: left as f64,
            op: Operator::Multiply,
            right: right as f64,
        },
        answer: (table * multiplier) as f64,
        tags: vec![Tag::Multiplication, Tag::Tables],
        bonus: u8::from(table >= HARD_FACTOR || multiplier >= HARD_FACTOR),
    }
}

pub fn squares<R: Rng + ?Sized>(max: u32, tier: Tier, rng: &mut R) -> Draft {
    let cap = by_tier(tier, [5, 10, 15, u32::MAX]);
    let bound = max.min(cap).max(2) as i64;
    let base = rng.gen_range(1..=bound);

    Draft {
        expression: Expression::Power { base, exponent: 2 },
        answer: (base * base) as f64,
        tags: vec![Tag::Multiplication, Tag::Squares],
        bonus: u8::from(base >= HARD_FACTOR) + u8::from(base > 12),
    }
}

pub fn cubes<R: Rng + ?Sized>(max: u32, tier: Tier, rng: &mut R) -> Draft {
    let cap = by_tier(tier, [3, 5, 8, u32::MAX]);
    let bound = max.min(cap).max(2) as i64;
    let base = rng.gen_range(1..=bound);

    // three factors are always a step up from a square
    Draft {
        expression: Expression::Power { base, exponent: 3 },
        answer: (base * base * base) as f64,
        tags: vec![Tag::Multiplication, Tag::Cubes],
        bonus: 1 + u8::from(base >= 5),
    }
}

/// (larger unit, smaller unit, ratio)
fn unit_pairs(kind: UnitKind) -> &'static [(Unit, Unit, i64)] {
    match kind {
        UnitKind::Length => &[
            (Unit::Meter, Unit::Centimeter, 100),
            (Unit::Kilometer, Unit::Meter, 1000),
        ],
        UnitKind::Mass => &[(Unit::Kilogram, Unit::Gram, 1000)],
        UnitKind::Time => &[(Unit::Hour, Unit::Minute, 60), (Unit::Minute, Unit::Second, 60)],
        UnitKind::Volume => &[(Unit::Liter, Unit::Milliliter, 1000)],
    }
}

pub fn unit_conversion<R: Rng + ?Sized>(kind: UnitKind, tier: Tier, rng: &mut R) -> Draft {
    let (large, small, ratio) = unit_pairs(kind)
        .choose(rng)
        .copied()
        .unwrap_or((Unit::Meter, Unit::Centimeter, 100));
    let amount = rng.gen_range(1..=by_tier(tier, [5, 10, 20, 50]));

    if rng.gen_bool(0.5) {
        Draft {
            expression: Expression::Conversion {
                value: amount as f64,
                from: large,
                to: small,
            },
            answer: (amount * ratio) as f64,
            tags: vec![Tag::Multiplication, Tag::Conversion],
            bonus: 0,
        }
    } else {
        // exact multiple so the division has no remainder
        Draft {
            expression: Expression::Conversion {
                value: (amount * ratio) as f64,
                from: small,
                to: large,
            },
            answer: amount as f64,
            tags: vec![Tag::Division, Tag::Conversion],
            bonus: 1,
        }
    }
}

/// Celsius in steps of 5 and Fahrenheit of the form 9k + 32 keep answers whole
pub fn temperature<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Draft {
    let (lo, hi) = by_tier(tier, [(0, 4), (0, 8), (-4, 12), (-8, 20)]);
    let k: i64 = rng.gen_range(lo..=hi);
    let celsius = 5 * k;
    let fahrenheit = 9 * k + 32;

    let (value, from, to, answer) = if rng.gen_bool(0.5) {
        (celsius, Unit::Celsius, Unit::Fahrenheit, fahrenheit)
    } else {
        (fahrenheit, Unit::Fahrenheit, Unit::Celsius, celsius)
    };

    Draft {
        expression: Expression::Conversion {
            value: value as f64,
            from,
            to,
        },
        answer: answer as f64,
        tags: vec![Tag::Conversion, Tag::Temperature],
        bonus: 1 + u8::from(value < 0 || answer < 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tables_always_use_the_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        for tier in Tier::ALL {
            for _ in 0..100 {
                let draft = tables(7, tier, &mut rng);
                match draft.expression {
                    Expression::Binary { left, right, .. } => {
                        assert!(left == 7.0 || right == 7.0);
                        assert_eq!(draft.answer, left * right);
                    }
                    ref other => panic!("unexpected expression {:?}", other),
                }
                assert_eq!(draft.tags, vec![Tag::Multiplication, Tag::Tables]);
                assert_eq!(draft.bonus, 1);
            }
        }
    }

    #[test]
    fn test_squares_respect_topic_and_tier_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        for _ in 0..200 {
            match squares(20, Tier::VeryEasy, &mut rng).expression {
                Expression::Power { base, exponent } => {
                    assert!(base <= 5);
                    assert_eq!(exponent, 2);
                }
                ref other => panic!("unexpected expression {:?}", other),
            }
            match squares(8, Tier::Hard, &mut rng).expression {
                Expression::Power { base, .. } => assert!(base <= 8),
                ref other => panic!("unexpected expression {:?}", other),
            }
        }
    }

    #[test]
    fn test_cubes_answer_and_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        for _ in 0..200 {
            let draft = cubes(10, Tier::Hard, &mut rng);
            if let Expression::Power { base, .. } = draft.expression {
                assert_eq!(draft.answer, (base * base * base) as f64);
                assert_eq!(draft.bonus, 1 + u8::from(base >= 5));
            }
        }
    }

    #[test]
    fn test_unit_conversion_is_exact_in_both_directions() {
        let mut rng = ChaCha8Rng::seed_from_u64(34);
        let mut saw_divide = false;
        let mut saw_multiply = false;
        for kind in [UnitKind::Length, UnitKind::Mass, UnitKind::Time, UnitKind::Volume] {
            for _ in 0..100 {
                let draft = unit_conversion(kind, Tier::Medium, &mut rng);
                assert_eq!(draft.answer.fract(), 0.0);
                assert_eq!(draft.tags[1], Tag::Conversion);
                match draft.tags[0] {
                    Tag::Division => {
                        saw_divide = true;
                        assert_eq!(draft.bonus, 1);
                    }
                    Tag::Multiplication => {
                        saw_multiply = true;
                        assert_eq!(draft.bonus, 0);
                    }
                    other => panic!("unexpected primary tag {:?}", other),
                }
            }
        }
        assert!(saw_divide && saw_multiply);
    }

    #[test]
    fn test_temperature_round_trips_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(35);
        for tier in Tier::ALL {
            for _ in 0..100 {
                let draft = temperature(tier, &mut rng);
                match draft.expression {
                    Expression::Conversion { value, from: Unit::Celsius, to: Unit::Fahrenheit } => {
                        assert_eq!(draft.answer, value * 9.0 / 5.0 + 32.0);
                    }
                    Expression::Conversion { value, from: Unit::Fahrenheit, to: Unit::Celsius } => {
                        assert_eq!(draft.answer, (value - 32.0) * 5.0 / 9.0);
                    }
                    ref other => panic!("unexpected expression {:?}", other),
                }
                assert!(draft.bonus >= 1);
            }
        }
    }
}
