//! Closed-form expected outcome of an attack
//!
//! Modifiers are not applied; the chain is the plain
//! attacks → hits → wounds → unsaved → damage product.

use crate::combat::profile::AttackProfile;
use crate::combat::targets::probability_from_target;
use crate::core::types::TargetNumber;
use crate::records::{UnitRecord, WeaponRecord};
use serde::{Deserialize, Serialize};

/// Average results of one attack sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedOutcome {
    pub exp_attacks: f64,
    pub exp_hits: f64,
    pub exp_wounds: f64,
    pub exp_unsaved: f64,
    pub exp_damage: f64,
}

impl ExpectedOutcome {
    /// Missing hit or wound probability zeroes that term and everything after it
    pub fn from_profile(profile: &AttackProfile) -> Self {
        let chance = |target: Option<TargetNumber>| {
            target
                .and_then(|t| probability_from_target(t.value() as i64))
                .unwrap_or(0.0)
        };

        let exp_attacks = profile.attacks.fixed_or_avg() * profile.models_in_range as f64;
        let exp_hits = exp_attacks * chance(profile.hit_target);
        let exp_wounds = exp_hits * chance(profile.wound_target);
        let exp_unsaved = exp_wounds * (1.0 - chance(profile.save_target()));
        let exp_damage = exp_unsaved * profile.damage.fixed_or_avg();

        Self {
            exp_attacks,
            exp_hits,
            exp_wounds,
            exp_unsaved,
            exp_damage,
        }
    }
}

/// Expected outcome for a selection; no weapon yields all zeros
pub fn expected_outcome(
    attacker: &UnitRecord,
    weapon: Option<&WeaponRecord>,
    defender: Option<&UnitRecord>,
    models_in_range: u32,
) -> ExpectedOutcome {
    match weapon {
        Some(weapon) => ExpectedOutcome::from_profile(&AttackProfile::resolve(
            attacker,
            weapon,
            weapon.section(),
            defender,
            models_in_range,
        )),
        None => ExpectedOutcome::default(),
    }
}
