//! Common Types and Constants
//!
//! Shared data structures used across the generation, statistics and pacing
//! modules: tiers, tags, topics, problem descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

// ==================== Constants ====================

/// Lower bound of any allotted solve time (seconds)
pub const MIN_TIME_SECONDS: f64 = 2.0;

/// Upper bound of any allotted solve time (seconds)
pub const MAX_TIME_SECONDS: f64 = 12.0;

/// Allotted times are quantized to this step (seconds)
pub const TIME_STEP_SECONDS: f64 = 0.5;

/// Difficulty score bounds
pub const MIN_DIFFICULTY_SCORE: u8 = 1;
pub const MAX_DIFFICULTY_SCORE: u8 = 5;

/// Tolerance used when checking submitted answers
pub const ANSWER_TOLERANCE: f64 = 1e-3;

// ==================== Tier ====================

/// Ordered difficulty tier assigned per problem slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    VeryEasy,
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::VeryEasy, Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryEasy => "very_easy",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            Self::Medium => Self::Easy,
            _ => Self::VeryEasy,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::VeryEasy => 0,
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "very_easy" | "veryeasy" => Ok(Self::VeryEasy),
            "easy" => Ok(Self::Easy),
            "medium" | "mid" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ParseError::UnknownTier(other.to_string())),
        }
    }
}

// ==================== Tag ====================

/// Operation family or sub-skill label attached to a problem.
///
/// The first tag on a problem is its primary family and is the key used for
/// bucketing and session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    // Primary families
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Integers,
    Decimals,
    Fractions,
    Conversion,
    // Sub-skills
    Carry,
    Borrow,
    NegativeOperand,
    CrossZero,
    SameDenominator,
    DifferentDenominator,
    FractionMultiply,
    // Topics
    Tables,
    Squares,
    Cubes,
    Temperature,
}

impl Tag {
    pub const ALL: [Tag; 19] = [
        Tag::Addition,
        Tag::Subtraction,
        Tag::Multiplication,
        Tag::Division,
        Tag::Integers,
        Tag::Decimals,
        Tag::Fractions,
        Tag::Conversion,
        Tag::Carry,
        Tag::Borrow,
        Tag::NegativeOperand,
        Tag::CrossZero,
        Tag::SameDenominator,
        Tag::DifferentDenominator,
        Tag::FractionMultiply,
        Tag::Tables,
        Tag::Squares,
        Tag::Cubes,
        Tag::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Integers => "integers",
            Self::Decimals => "decimals",
            Self::Fractions => "fractions",
            Self::Conversion => "conversion",
            Self::Carry => "carry",
            Self::Borrow => "borrow",
            Self::NegativeOperand => "negative_operand",
            Self::CrossZero => "cross_zero",
            Self::SameDenominator => "same_denominator",
            Self::DifferentDenominator => "different_denominator",
            Self::FractionMultiply => "fraction_multiply",
            Self::Tables => "tables",
            Self::Squares => "squares",
            Self::Cubes => "cubes",
            Self::Temperature => "temperature",
        }
    }

    /// Fraction family members count against the session fraction cap
    pub fn is_fraction_family(&self) -> bool {
        matches!(
            self,
            Self::Fractions
                | Self::SameDenominator
                | Self::DifferentDenominator
                | Self::FractionMultiply
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == key)
            .ok_or(ParseError::UnknownTag(key))
    }
}

// ==================== Topic ====================

/// Measurement family used by the unit-conversion topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Length,
    Mass,
    Time,
    Volume,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::Volume => "volume",
        }
    }
}

impl FromStr for UnitKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(Self::Length),
            "mass" => Ok(Self::Mass),
            "time" => Ok(Self::Time),
            "volume" => Ok(Self::Volume),
            other => Err(ParseError::InvalidTopicArgument {
                topic: "units",
                value: other.to_string(),
            }),
        }
    }
}

/// Themed practice mode selected by the caller.
///
/// A topic narrows which factories are eligible; it never touches the
/// statistics model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Topic {
    Tables { table: u32 },
    Squares { max: u32 },
    Cubes { max: u32 },
    Units { unit: UnitKind },
    Temperature,
    Fractions,
}

impl Topic {
    /// Topic tag attached after the primary family
    pub fn tag(&self) -> Tag {
        match self {
            Self::Tables { .. } => Tag::Tables,
            Self::Squares { .. } => Tag::Squares,
            Self::Cubes { .. } => Tag::Cubes,
            Self::Units { .. } => Tag::Conversion,
            Self::Temperature => Tag::Temperature,
            Self::Fractions => Tag::Fractions,
        }
    }

    pub fn key(&self) -> String {
        match self {
            Self::Tables { table } => format!("tables:{table}"),
            Self::Squares { max } => format!("squares:{max}"),
            Self::Cubes { max } => format!("cubes:{max}"),
            Self::Units { unit } => format!("units:{}", unit.as_str()),
            Self::Temperature => "temperature".to_string(),
            Self::Fractions => "fractions".to_string(),
        }
    }
}

fn parse_bounded(
    topic: &'static str,
    raw: Option<&str>,
    lo: u32,
    hi: u32,
) -> Result<u32, ParseError> {
    let raw = raw.unwrap_or("").trim();
    match raw.parse::<u32>() {
        Ok(value) if (lo..=hi).contains(&value) => Ok(value),
        _ => Err(ParseError::InvalidTopicArgument {
            topic,
            value: raw.to_string(),
        }),
    }
}

impl FromStr for Topic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let mut parts = lowered.splitn(2, ':');
        let name = parts.next().unwrap_or("");
        let arg = parts.next();

        match name {
            "tables" => Ok(Self::Tables {
                table: parse_bounded("tables", arg, 2, 20)?,
            }),
            "squares" => Ok(Self::Squares {
                max: parse_bounded("squares", arg, 2, 30)?,
            }),
            "cubes" => Ok(Self::Cubes {
                max: parse_bounded("cubes", arg, 2, 15)?,
            }),
            "units" => Ok(Self::Units {
                unit: arg.unwrap_or("").parse()?,
            }),
            "temperature" => Ok(Self::Temperature),
            "fractions" => Ok(Self::Fractions),
            _ => Err(ParseError::UnknownTopic(lowered)),
        }
    }
}

// ==================== Problem ====================

/// Arithmetic operator symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '−',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => {
                if right == 0.0 {
                    0.0
                } else {
                    left / right
                }
            }
        }
    }
}

/// Unit symbols used by conversion problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kilometer,
    Meter,
    Centimeter,
    Kilogram,
    Gram,
    Hour,
    Minute,
    Second,
    Liter,
    Milliliter,
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Kilometer => "km",
            Self::Meter => "m",
            Self::Centimeter => "cm",
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Hour => "h",
            Self::Minute => "min",
            Self::Second => "s",
            Self::Liter => "L",
            Self::Milliliter => "mL",
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Numerator/denominator pair. No reduction is applied on generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionOperand {
    pub numerator: i64,
    pub denominator: i64,
}

impl FractionOperand {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }
}

impl fmt::Display for FractionOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Structured question body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Expression {
    Binary {
        left: f64,
        op: Operator,
        right: f64,
    },
    Power {
        base: i64,
        exponent: u32,
    },
    Fraction {
        left: FractionOperand,
        op: Operator,
        right: FractionOperand,
    },
    Conversion {
        value: f64,
        from: Unit,
        to: Unit,
    },
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn format_operand(value: f64) -> String {
    if value < 0.0 {
        format!("({})", format_number(value))
    } else {
        format_number(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { left, op, right } => write!(
                f,
                "{} {} {}",
                format_number(*left),
                op.symbol(),
                format_operand(*right)
            ),
            Self::Power { base, exponent } => {
                let mark = match exponent {
                    2 => "²".to_string(),
                    3 => "³".to_string(),
                    other => format!("^{other}"),
                };
                write!(f, "{base}{mark}")
            }
            Self::Fraction { left, op, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Self::Conversion { value, from, to } => write!(
                f,
                "{} {} → {}",
                format_number(*value),
                from.symbol(),
                to.symbol()
            ),
        }
    }
}

/// A fully formed practice problem. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub expression: Expression,
    pub answer: f64,
    pub tier: Tier,
    pub difficulty_score: u8,
    /// Non-empty; `tags[0]` is the primary family
    pub tags: Vec<Tag>,
    pub time_allotted: f64,
}

impl Problem {
    pub fn primary_tag(&self) -> Tag {
        self.tags.first().copied().unwrap_or(Tag::Addition)
    }

    /// Structured fraction layout annotation
    pub fn is_fraction(&self) -> bool {
        matches!(self.expression, Expression::Fraction { .. })
    }

    pub fn text(&self) -> String {
        self.expression.to_string()
    }

    pub fn check(&self, submitted: f64) -> bool {
        submitted.is_finite() && (submitted - self.answer).abs() < ANSWER_TOLERANCE
    }
}

/// Map a prior accuracy ratio onto the 1-10 aptitude scale
pub fn aptitude_from_accuracy(ratio: f64) -> u8 {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    ((ratio * 10.0).round() as u8).clamp(1, 10)
}
