//! Unit records as resolved by the roster collaborator
//!
//! Leader attachment has already been merged in by the time a unit reaches
//! the engine; keywords and abilities here are the combined set.

use crate::core::error::{AttackError, Result};
use crate::core::types::TargetNumber;
use crate::records::fields::{as_count, as_digit, as_strings, as_text, lookup, UnitField};
use crate::records::weapon::{group_weapons, GroupedWeapons, WeaponRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named ability with free-form rules text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ability {
    pub name: String,
    pub description: String,
}

/// A unit on either side of an attack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitRecord {
    pub id: Option<String>,
    pub name: String,
    /// Nominal model count
    pub models: u32,
    /// Models still on the table, when tracked
    pub current_models: Option<u32>,
    pub toughness: Option<u32>,
    pub strength: Option<u32>,
    /// Raw armour save as listed ("3+", "3")
    pub armour_save: Option<String>,
    /// Raw invulnerable save as listed
    pub invulnerable_save: Option<String>,
    pub ballistic_skill: Option<u8>,
    pub weapon_skill: Option<u8>,
    pub abilities: Vec<Ability>,
    pub keywords: Vec<String>,
    pub weapons: Vec<WeaponRecord>,
    /// Explicit carriers per weapon name
    pub weapon_carriers: BTreeMap<String, u32>,
}

impl UnitRecord {
    /// Decode a unit from roster JSON using the canonical field resolvers
    pub fn from_json(value: &Value) -> Result<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| AttackError::InvalidRecord(format!("unit is not an object: {}", value)))?;

        let text = |field: UnitField| lookup(record, field).and_then(as_text);
        let count = |field: UnitField| lookup(record, field).and_then(as_count);
        let digit = |field: UnitField| lookup(record, field).and_then(as_digit);

        let weapons = match lookup(record, UnitField::Weapons) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(WeaponRecord::from_map)
                .collect(),
            _ => Vec::new(),
        };

        let abilities = match lookup(record, UnitField::Abilities) {
            Some(Value::Array(items)) => items.iter().filter_map(ability_from_json).collect(),
            _ => Vec::new(),
        };

        let weapon_carriers = match lookup(record, UnitField::WeaponCarriers) {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, v)| v.is_number())
                .filter_map(|(k, v)| as_count(v).map(|c| (k.clone(), c)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Ok(Self {
            id: text(UnitField::Id),
            name: text(UnitField::Name).unwrap_or_default(),
            models: count(UnitField::Models).unwrap_or(1),
            current_models: count(UnitField::CurrentModels),
            toughness: count(UnitField::Toughness).filter(|&t| t > 0),
            strength: count(UnitField::Strength).filter(|&s| s > 0),
            armour_save: text(UnitField::ArmourSave),
            invulnerable_save: text(UnitField::InvulnerableSave),
            ballistic_skill: digit(UnitField::BallisticSkill),
            weapon_skill: digit(UnitField::WeaponSkill),
            abilities,
            keywords: as_strings(lookup(record, UnitField::Keywords)),
            weapons,
            weapon_carriers,
        })
    }

    /// Decode a unit from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Models present: current if tracked, otherwise nominal; never below 1
    pub fn current_model_count(&self) -> u32 {
        self.current_models.unwrap_or(self.models).max(1)
    }

    pub fn armour_save_target(&self) -> Option<TargetNumber> {
        self.armour_save.as_deref().and_then(parse_save)
    }

    /// Listed invulnerable save, else one inferred from ability text
    pub fn invulnerable_save_target(&self) -> Option<TargetNumber> {
        self.invulnerable_save
            .as_deref()
            .and_then(parse_save)
            .or_else(|| infer_invulnerable(&self.abilities))
    }

    /// Weapon profiles with duplicates merged, split by section
    pub fn grouped_weapons(&self) -> GroupedWeapons {
        group_weapons(&self.weapons)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

fn ability_from_json(value: &Value) -> Option<Ability> {
    match value {
        Value::Object(map) => Some(Ability {
            name: map.get("name").and_then(as_text).unwrap_or_default(),
            description: map.get("description").and_then(as_text).unwrap_or_default(),
        }),
        Value::String(name) => Some(Ability {
            name: name.clone(),
            description: String::new(),
        }),
        _ => None,
    }
}

/// First digit of a save characteristic, clamped to `[2, 6]`; 0 or none is absent
pub fn parse_save(text: &str) -> Option<TargetNumber> {
    let digit = text.trim().chars().find_map(|c| c.to_digit(10))?;
    if digit == 0 {
        return None;
    }
    Some(TargetNumber::clamped(digit as i64))
}

/// Invulnerable save from abilities mentioning it (or a daemonic save)
pub fn infer_invulnerable(abilities: &[Ability]) -> Option<TargetNumber> {
    abilities.iter().find_map(|ability| {
        let name = ability.name.to_lowercase();
        let description = ability.description.to_lowercase();
        let relevant = name.contains("invulnerable")
            || description.contains("invulnerable")
            || mentions_daemonic_save(&description);
        if relevant {
            first_plus_digit(&ability.description).and_then(|d| TargetNumber::within_range(d as i64))
        } else {
            None
        }
    })
}

/// "daemon save", "daemonic save", with any spacing before "save"
fn mentions_daemonic_save(lower: &str) -> bool {
    lower.match_indices("daemon").any(|(idx, word)| {
        let rest = &lower[idx + word.len()..];
        let rest = rest.strip_prefix("ic").unwrap_or(rest);
        rest.trim_start().starts_with("save")
    })
}

/// First digit that is followed (after optional spaces) by '+'
fn first_plus_digit(text: &str) -> Option<u32> {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().find_map(|(i, c)| {
        let digit = c.to_digit(10)?;
        let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
        (next == Some(&'+')).then_some(digit)
    })
}
