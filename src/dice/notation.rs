//! Weapon attack/damage notation: "3", "D3", "2D6", "D6+1", "2D3+3"
//!
//! Parsing never fails. Strings that cannot be summarised statistically stay
//! as `Dice` descriptors without stats and are rolled through the literal
//! expression evaluator in [`crate::dice::tray`].

use crate::dice::rng::RandomSource;
use crate::dice::tray::DiceExpression;
use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt},
    sequence::preceded,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw attack or damage value as it arrives on a weapon record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceValue {
    Fixed(u32),
    Notation(String),
}

impl fmt::Display for DiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceValue::Fixed(value) => write!(f, "{}", value),
            DiceValue::Notation(text) => write!(f, "{}", text),
        }
    }
}

/// Derived statistics for `(count)D(sides)(+bonus)`
///
/// `min` and `max` are widened so `count × sides + bonus` never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiceStats {
    pub count: u32,
    pub sides: u32,
    pub bonus: u32,
    pub avg: f64,
    pub min: u64,
    pub max: u64,
}

impl DiceStats {
    pub fn new(count: u32, sides: u32, bonus: u32) -> Self {
        Self {
            count,
            sides,
            bonus,
            avg: count as f64 * (sides as f64 + 1.0) / 2.0 + bonus as f64,
            min: count as u64 + bonus as u64,
            max: count as u64 * sides as u64 + bonus as u64,
        }
    }
}

/// Parser output: a fixed number, or something that must be rolled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiceDescriptor {
    Fixed {
        value: u32,
    },
    Dice {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stats: Option<DiceStats>,
    },
}

/// Faces rolled while resolving a descriptor, plus the resulting total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceRoll {
    pub faces: Vec<u32>,
    pub total: u32,
}

impl DiceDescriptor {
    pub fn is_fixed(&self) -> bool {
        matches!(self, DiceDescriptor::Fixed { .. })
    }

    pub fn stats(&self) -> Option<&DiceStats> {
        match self {
            DiceDescriptor::Dice { stats, .. } => stats.as_ref(),
            DiceDescriptor::Fixed { .. } => None,
        }
    }

    /// Fixed value, or the dice average; unsummarisable notation counts as 0
    pub fn fixed_or_avg(&self) -> f64 {
        match self {
            DiceDescriptor::Fixed { value } => *value as f64,
            DiceDescriptor::Dice { stats, .. } => stats.map(|s| s.avg).unwrap_or(0.0),
        }
    }

    /// Die size shown for this descriptor's faces
    pub fn sides(&self) -> Option<u32> {
        match self {
            DiceDescriptor::Fixed { .. } => None,
            DiceDescriptor::Dice { stats: Some(stats), .. } => Some(stats.sides),
            DiceDescriptor::Dice { value, .. } => Some(DiceExpression::parse(value).sides),
        }
    }

    /// Resolve once. Fixed values roll no dice; totals saturate at `u32::MAX`.
    pub fn roll(&self, dice: &mut dyn RandomSource) -> DiceRoll {
        match self {
            DiceDescriptor::Fixed { value } => DiceRoll {
                faces: Vec::new(),
                total: *value,
            },
            DiceDescriptor::Dice {
                stats: Some(stats), ..
            } => {
                let faces: Vec<u32> = (0..stats.count).map(|_| dice.roll_die(stats.sides)).collect();
                let total = faces.iter().fold(stats.bonus, |acc, &face| acc.saturating_add(face));
                DiceRoll { faces, total }
            }
            DiceDescriptor::Dice { value, stats: None } => DiceExpression::parse(value).roll(dice),
        }
    }
}

impl fmt::Display for DiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceDescriptor::Fixed { value } => write!(f, "{}", value),
            DiceDescriptor::Dice { value, .. } => write!(f, "{}", value),
        }
    }
}

pub(crate) fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>()).parse(input)
}

type NotationParts = (Option<u32>, char, u32, Option<u32>);

fn notation(input: &str) -> IResult<&str, NotationParts> {
    all_consuming((opt(number), one_of("dD"), number, opt(preceded(char('+'), number)))).parse(input)
}

/// Parse a raw weapon value. Absent values are a fixed 0.
pub fn parse_dice_notation(value: Option<&DiceValue>) -> DiceDescriptor {
    match value {
        None => DiceDescriptor::Fixed { value: 0 },
        Some(DiceValue::Fixed(value)) => DiceDescriptor::Fixed { value: *value },
        Some(DiceValue::Notation(text)) => parse_notation(text),
    }
}

/// Parse notation text: numeric strings are fixed, `(N)D(S)(+B)` gets stats
pub fn parse_notation(text: &str) -> DiceDescriptor {
    let normalized = text.trim().to_uppercase();

    if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = normalized.parse::<u32>() {
            return DiceDescriptor::Fixed { value };
        }
    }

    let stats = match notation(&normalized) {
        Ok((_, (count, _, sides, bonus))) => {
            let count = count.unwrap_or(1);
            if count == 0 || sides == 0 {
                None
            } else {
                Some(DiceStats::new(count, sides, bonus.unwrap_or(0)))
            }
        }
        Err(_) => None,
    };

    DiceDescriptor::Dice {
        value: normalized,
        stats,
    }
}
