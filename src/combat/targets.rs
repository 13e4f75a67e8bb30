//! Target numbers for hit, wound and save checks
//!
//! Every function here is pure. A missing stat yields `None`, never an
//! assumed average; callers render that as "missing".

use crate::core::types::{Section, TargetNumber};
use crate::records::{parse_save, UnitRecord, WeaponRecord};
use serde::{Deserialize, Serialize};

/// Strength vs Toughness wound target
///
/// S ≥ 2T → 2+, S > T → 3+, S = T → 4+, 2S ≤ T → 6+, otherwise 5+.
/// Zero on either side means the stat is missing.
pub fn wound_target(strength: u32, toughness: u32) -> Option<TargetNumber> {
    if strength == 0 || toughness == 0 {
        return None;
    }
    let (s, t) = (strength as u64, toughness as u64);
    let target = if s >= 2 * t {
        2
    } else if s > t {
        3
    } else if s == t {
        4
    } else if 2 * s <= t {
        6
    } else {
        5
    };
    Some(TargetNumber::clamped(target))
}

/// Human label for the wound rule that applied
pub fn explain_wound_rule(strength: u32, toughness: u32) -> Option<&'static str> {
    let target = wound_target(strength, toughness)?;
    Some(match target.value() {
        2 => "S ≥ 2T → 2+",
        3 => "S > T → 3+",
        4 => "S = T → 4+",
        6 => "S ≤ T/2 → 6+",
        _ => "S < T → 5+",
    })
}

/// `(7 - target) / 6` clamped to `[0, 1]`; `None` for a target below 2
pub fn probability_from_target(target: i64) -> Option<f64> {
    if target < 2 {
        return None;
    }
    Some(((7 - target) as f64 / 6.0).clamp(0.0, 1.0))
}

/// Worsen an armour save by |AP|, clamped to `[2, 6]`
pub fn apply_ap(armour: Option<TargetNumber>, ap: i32) -> Option<TargetNumber> {
    armour.map(|save| TargetNumber::clamped(save.value() as i64 + (ap as i64).abs()))
}

/// Parse an armour save ("3+", "3") and apply AP; `None` without a save
pub fn apply_ap_to_save(armour_save: Option<&str>, ap: i32) -> Option<TargetNumber> {
    apply_ap(armour_save.and_then(parse_save), ap)
}

/// Better (lower) of armour-after-AP and the invulnerable save
pub fn best_save_target_after_ap(
    armour_save: Option<&str>,
    ap: i32,
    invulnerable_save: Option<&str>,
) -> Option<TargetNumber> {
    let armour = apply_ap_to_save(armour_save, ap);
    let invulnerable = invulnerable_save.and_then(parse_save);
    match (armour, invulnerable) {
        (Some(a), Some(i)) => Some(a.min(i)),
        (a, i) => a.or(i),
    }
}

/// Which save the defender ends up rolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Armour,
    Invulnerable,
}

/// Full save picture for one weapon against one defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveBreakdown {
    pub armour_after_ap: Option<TargetNumber>,
    pub invulnerable: Option<TargetNumber>,
    pub best: Option<TargetNumber>,
    pub used: Option<SaveKind>,
}

/// Save breakdown from parsed saves; the invulnerable wins ties
pub fn defender_save(
    armour: Option<TargetNumber>,
    ap: i32,
    invulnerable: Option<TargetNumber>,
) -> SaveBreakdown {
    let armour_after_ap = apply_ap(armour, ap);
    let (best, used) = match (armour_after_ap, invulnerable) {
        (a, Some(i)) if a.map_or(true, |a| i <= a) => (Some(i), Some(SaveKind::Invulnerable)),
        (Some(a), _) => (Some(a), Some(SaveKind::Armour)),
        _ => (None, None),
    };
    SaveBreakdown {
        armour_after_ap,
        invulnerable,
        best,
        used,
    }
}

/// Save breakdown from raw save text
pub fn compute_defender_save(
    armour_save: Option<&str>,
    ap: i32,
    invulnerable_save: Option<&str>,
) -> SaveBreakdown {
    defender_save(
        armour_save.and_then(parse_save),
        ap,
        invulnerable_save.and_then(parse_save),
    )
}

/// Hit target: weapon skill if valid, else BS (ranged) or WS (melee)
///
/// Skills outside `[2, 6]` are treated as absent rather than clamped.
pub fn resolve_hit_target(
    weapon: &WeaponRecord,
    attacker: &UnitRecord,
    section: Section,
) -> Option<TargetNumber> {
    let weapon_skill = weapon.skill.and_then(|s| TargetNumber::within_range(s as i64));
    weapon_skill.or_else(|| {
        let base = match section {
            Section::Ranged => attacker.ballistic_skill,
            Section::Melee => attacker.weapon_skill,
        };
        base.and_then(|s| TargetNumber::within_range(s as i64))
    })
}

/// Weapon strength, falling back to the attacker's own strength
pub fn effective_strength(weapon: &WeaponRecord, attacker: &UnitRecord) -> Option<u32> {
    weapon
        .strength
        .filter(|&s| s > 0)
        .or(attacker.strength.filter(|&s| s > 0))
}
