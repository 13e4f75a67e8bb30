//! Everything the phase roller needs, resolved once per selection

use crate::combat::carriers::resolve_carrier_count;
use crate::combat::targets::{
    defender_save, effective_strength, resolve_hit_target, wound_target, SaveBreakdown,
};
use crate::core::types::{Section, TargetNumber};
use crate::dice::{parse_dice_notation, DiceDescriptor};
use crate::records::{UnitRecord, WeaponRecord};
use serde::{Deserialize, Serialize};

/// Resolved numbers for one attacker/weapon/defender selection
///
/// Any `None` target means the stat could not be determined. Phases that
/// depend on it stay inert instead of guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub weapon: String,
    pub section: Section,
    pub models_in_range: u32,
    pub attacks: DiceDescriptor,
    pub damage: DiceDescriptor,
    pub hit_target: Option<TargetNumber>,
    pub strength: Option<u32>,
    pub toughness: Option<u32>,
    pub wound_target: Option<TargetNumber>,
    pub ap: i32,
    pub save: SaveBreakdown,
}

impl AttackProfile {
    /// Resolve a selection; `models_in_range` of 0 is raised to 1
    pub fn resolve(
        attacker: &UnitRecord,
        weapon: &WeaponRecord,
        section: Section,
        defender: Option<&UnitRecord>,
        models_in_range: u32,
    ) -> Self {
        let strength = effective_strength(weapon, attacker);
        let toughness = defender.and_then(|d| d.toughness);
        let wound = match (strength, toughness) {
            (Some(s), Some(t)) => wound_target(s, t),
            _ => None,
        };
        let save = defender
            .map(|d| defender_save(d.armour_save_target(), weapon.ap, d.invulnerable_save_target()))
            .unwrap_or_default();

        Self {
            weapon: weapon.label().to_string(),
            section,
            models_in_range: models_in_range.max(1),
            attacks: parse_dice_notation(weapon.attacks.as_ref()),
            damage: parse_dice_notation(weapon.damage.as_ref()),
            hit_target: resolve_hit_target(weapon, attacker, section),
            strength,
            toughness,
            wound_target: wound,
            ap: weapon.ap,
            save,
        }
    }

    /// Resolve with every carrier of the weapon in range
    pub fn with_carriers(
        attacker: &UnitRecord,
        weapon: &WeaponRecord,
        defender: Option<&UnitRecord>,
    ) -> Self {
        let carriers = resolve_carrier_count(attacker, weapon);
        Self::resolve(attacker, weapon, weapon.section(), defender, carriers)
    }

    pub fn save_target(&self) -> Option<TargetNumber> {
        self.save.best
    }
}
