//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sides on the die rolled for every hit, wound and save check
pub const CHECK_DIE: u32 = 6;

/// Best possible target number on a d6 check
pub const MIN_TARGET: u8 = 2;
/// Worst possible target number on a d6 check
pub const MAX_TARGET: u8 = 6;

/// Minimum die face needed to pass a check.
///
/// Always within `[2, 6]`. An undeterminable target is `Option::None`,
/// never a guessed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct TargetNumber(u8);

impl TargetNumber {
    /// Clamp any computed value into `[2, 6]`
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(MIN_TARGET as i64, MAX_TARGET as i64) as u8)
    }

    /// Accept a value only if it already lies within `[2, 6]`
    pub fn within_range(value: i64) -> Option<Self> {
        if (MIN_TARGET as i64..=MAX_TARGET as i64).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Chance that a single d6 meets this target: `(7 - t) / 6`
    pub fn probability(self) -> f64 {
        (7.0 - self.0 as f64) / 6.0
    }

    /// Does a rolled face pass this target?
    pub fn passed_by(self, face: u32) -> bool {
        face >= self.0 as u32
    }
}

impl From<TargetNumber> for u8 {
    fn from(target: TargetNumber) -> Self {
        target.0
    }
}

impl TryFrom<u8> for TargetNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::within_range(value as i64)
            .ok_or_else(|| format!("target number {} outside 2..=6", value))
    }
}

impl fmt::Display for TargetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+", self.0)
    }
}

/// Which weapon profile list the weapon was picked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Ranged,
    Melee,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Ranged => write!(f, "ranged"),
            Section::Melee => write!(f, "melee"),
        }
    }
}

/// The five stages of the attack sequence, in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Attacks,
    Hits,
    Wounds,
    Saves,
    Damage,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Attacks,
        Phase::Hits,
        Phase::Wounds,
        Phase::Saves,
        Phase::Damage,
    ];

    /// Position in the sequence (0 = attacks)
    pub fn index(self) -> usize {
        self as usize
    }

    /// The phase whose result feeds this one
    pub fn upstream(self) -> Option<Phase> {
        match self {
            Phase::Attacks => None,
            Phase::Hits => Some(Phase::Attacks),
            Phase::Wounds => Some(Phase::Hits),
            Phase::Saves => Some(Phase::Wounds),
            Phase::Damage => Some(Phase::Saves),
        }
    }

    /// The phase that consumes this one's result
    pub fn downstream(self) -> Option<Phase> {
        match self {
            Phase::Attacks => Some(Phase::Hits),
            Phase::Hits => Some(Phase::Wounds),
            Phase::Wounds => Some(Phase::Saves),
            Phase::Saves => Some(Phase::Damage),
            Phase::Damage => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Attacks => "attacks",
            Phase::Hits => "hits",
            Phase::Wounds => "wounds",
            Phase::Saves => "saves",
            Phase::Damage => "damage",
        };
        write!(f, "{}", name)
    }
}
