//! Hit modifiers the player can toggle between rolls

use crate::core::config::EngineConfig;
use crate::records::WeaponRecord;
use serde::{Deserialize, Serialize};

/// Lethal Hits and Sustained Hits X
///
/// Only the Hits phase reads these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierState {
    /// Extra hits per critical
    pub sustained: u32,
    /// Criticals wound automatically
    pub lethal: bool,
}

impl ModifierState {
    /// Seed from the weapon's own keywords
    pub fn from_weapon(weapon: &WeaponRecord, config: &EngineConfig) -> Self {
        Self {
            sustained: weapon.sustained_hits(),
            lethal: weapon.has_lethal_hits(),
        }
        .clamped(config)
    }

    pub fn clamped(self, config: &EngineConfig) -> Self {
        Self {
            sustained: self.sustained.min(config.max_sustained),
            ..self
        }
    }
}
