//! Weapon profiles as consumed from the roster collaborator

use crate::core::error::{AttackError, Result};
use crate::core::types::Section;
use crate::dice::DiceValue;
use crate::records::fields::{as_count, as_digit, as_flag, as_strings, as_text, lookup, WeaponField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Range sentinel marking a melee profile
pub const MELEE: &str = "Melee";

/// One weapon profile on a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponRecord {
    pub name: String,
    pub display_name: Option<String>,
    pub option_label: Option<String>,
    pub range: Option<String>,
    #[serde(rename = "type")]
    pub weapon_type: Option<String>,
    pub attacks: Option<DiceValue>,
    /// Hit skill override; only honoured within 2..=6
    pub skill: Option<u8>,
    pub strength: Option<u32>,
    /// Armour penetration, 0 or negative by convention
    pub ap: i32,
    pub damage: Option<DiceValue>,
    /// Explicit number of models carrying this weapon
    pub carry_count: Option<u32>,
    /// Grouping annotation; also read as a carrier hint
    pub count: Option<u32>,
    pub sergeant_only: bool,
    pub leader_only: bool,
    pub role: Option<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
}

impl WeaponRecord {
    /// Decode a weapon from roster JSON using the canonical field resolvers
    pub fn from_json(value: &Value) -> Result<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| AttackError::InvalidRecord(format!("weapon is not an object: {}", value)))?;
        Ok(Self::from_map(record))
    }

    pub(crate) fn from_map(record: &Map<String, Value>) -> Self {
        let text = |field: WeaponField| lookup(record, field).and_then(as_text);

        Self {
            name: text(WeaponField::Name).unwrap_or_default(),
            display_name: text(WeaponField::DisplayName),
            option_label: text(WeaponField::OptionLabel),
            range: text(WeaponField::Range),
            weapon_type: text(WeaponField::Type),
            attacks: lookup(record, WeaponField::Attacks).and_then(dice_value),
            skill: lookup(record, WeaponField::Skill).and_then(as_digit),
            strength: lookup(record, WeaponField::Strength).and_then(as_count),
            ap: lookup(record, WeaponField::Ap).map(ap_value).unwrap_or(0),
            damage: lookup(record, WeaponField::Damage).and_then(dice_value),
            carry_count: lookup(record, WeaponField::CarryCount).and_then(strict_count),
            count: lookup(record, WeaponField::Count).and_then(strict_count),
            sergeant_only: as_flag(lookup(record, WeaponField::SergeantOnly)),
            leader_only: as_flag(lookup(record, WeaponField::LeaderOnly)),
            role: text(WeaponField::Role),
            tags: as_strings(lookup(record, WeaponField::Tags)),
            keywords: as_strings(lookup(record, WeaponField::Keywords)),
        }
    }

    pub fn is_melee(&self) -> bool {
        self.range.as_deref() == Some(MELEE) || self.weapon_type.as_deref() == Some(MELEE)
    }

    pub fn section(&self) -> Section {
        if self.is_melee() {
            Section::Melee
        } else {
            Section::Ranged
        }
    }

    /// Label shown to players: display name, then option label, then name
    ///
    /// Blank labels are skipped.
    pub fn label(&self) -> &str {
        fn present(label: &Option<String>) -> Option<&str> {
            label.as_deref().filter(|s| !s.trim().is_empty())
        }
        present(&self.display_name)
            .or_else(|| present(&self.option_label))
            .unwrap_or(&self.name)
    }

    /// Carried by the unit's leader/sergeant alone
    pub fn is_leader_only(&self) -> bool {
        self.sergeant_only
            || self.leader_only
            || self.role.as_deref() == Some("sergeant")
            || self.tags.iter().any(|t| t == "sergeant-only")
    }

    /// Sustained Hits X from the weapon type and keywords
    pub fn sustained_hits(&self) -> u32 {
        parse_sustained_hits(&self.rule_text())
    }

    /// Lethal Hits from the weapon type and keywords
    pub fn has_lethal_hits(&self) -> bool {
        mentions_lethal_hits(&self.rule_text())
    }

    fn rule_text(&self) -> String {
        let mut parts: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
        if let Some(weapon_type) = self.weapon_type.as_deref() {
            parts.push(weapon_type);
        }
        parts.join(" ")
    }
}

/// Numbers must be real numbers to count as carrier hints
fn strict_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(_) => as_count(value),
        _ => None,
    }
}

fn dice_value(value: &Value) -> Option<DiceValue> {
    match value {
        Value::Number(_) => as_count(value).map(DiceValue::Fixed),
        Value::String(s) => Some(DiceValue::Notation(s.clone())),
        _ => None,
    }
}

fn ap_value(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n.as_i64().map(|i| i.clamp(i32::MIN as i64, i32::MAX as i64) as i32).unwrap_or(0),
        Value::String(s) => parse_ap(s),
        _ => 0,
    }
}

/// Parse AP text such as "-2", "−2" (unicode minus) or "2"; anything else is 0
pub fn parse_ap(text: &str) -> i32 {
    let normalized = text.replace('\u{2212}', "-");
    let bytes = normalized.as_bytes();

    let Some(start) = bytes.iter().position(|b| b.is_ascii_digit()) else {
        return 0;
    };
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(bytes.len());
    let magnitude: i32 = normalized[start..end].parse().unwrap_or(0);

    if start > 0 && bytes[start - 1] == b'-' {
        -magnitude
    } else {
        magnitude
    }
}

/// Find `Sustained Hits <X>` (case-insensitive); 0 when absent
pub fn parse_sustained_hits(text: &str) -> u32 {
    let lower = text.to_lowercase();
    for (idx, word) in lower.match_indices("sustained") {
        let rest = lower[idx + word.len()..].trim_start();
        if let Some(rest) = rest.strip_prefix("hits") {
            let digits: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(value) = digits.parse() {
                return value;
            }
        }
    }
    0
}

/// Does the text name the Lethal Hits rule?
pub fn mentions_lethal_hits(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.match_indices("lethal").any(|(idx, word)| {
        lower[idx + word.len()..].trim_start().starts_with("hits")
    })
}

/// Weapons split into the two profile lists, duplicates merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedWeapons {
    pub ranged: Vec<WeaponRecord>,
    pub melee: Vec<WeaponRecord>,
}

impl GroupedWeapons {
    pub fn list(&self, section: Section) -> &[WeaponRecord] {
        match section {
            Section::Ranged => &self.ranged,
            Section::Melee => &self.melee,
        }
    }

    pub fn get(&self, section: Section, index: usize) -> Option<&WeaponRecord> {
        self.list(section).get(index)
    }

    /// First profile (ranged, then melee) whose name or label matches
    pub fn find(&self, name: &str) -> Option<(Section, &WeaponRecord)> {
        let matches = |w: &&WeaponRecord| w.name.eq_ignore_ascii_case(name) || w.label().eq_ignore_ascii_case(name);
        self.ranged
            .iter()
            .find(matches)
            .map(|w| (Section::Ranged, w))
            .or_else(|| self.melee.iter().find(matches).map(|w| (Section::Melee, w)))
    }
}

/// Identity of a weapon profile for grouping; absent stats take table defaults
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProfileKey {
    name: String,
    range: String,
    weapon_type: String,
    attacks: DiceValue,
    skill: u8,
    strength: u32,
    ap: i32,
    damage: DiceValue,
}

impl ProfileKey {
    fn of(weapon: &WeaponRecord) -> Self {
        let range = if weapon.is_melee() {
            MELEE.to_string()
        } else {
            weapon.range.clone().unwrap_or_else(|| "12\"".to_string())
        };
        let weapon_type = weapon.weapon_type.clone().unwrap_or_else(|| {
            if range == MELEE {
                MELEE.to_string()
            } else {
                "Assault 1".to_string()
            }
        });
        Self {
            name: weapon.name.clone(),
            range,
            weapon_type,
            attacks: weapon.attacks.clone().unwrap_or(DiceValue::Fixed(1)),
            skill: weapon.skill.unwrap_or(3),
            strength: weapon.strength.unwrap_or(4),
            ap: weapon.ap,
            damage: weapon.damage.clone().unwrap_or(DiceValue::Fixed(1)),
        }
    }
}

/// Merge identical profiles (annotating `count`) and split ranged/melee
pub fn group_weapons(weapons: &[WeaponRecord]) -> GroupedWeapons {
    let mut grouped: Vec<WeaponRecord> = Vec::new();
    let mut index_of: HashMap<ProfileKey, usize> = HashMap::new();

    for weapon in weapons {
        let key = ProfileKey::of(weapon);
        match index_of.get(&key) {
            Some(&idx) => {
                let existing = &mut grouped[idx];
                existing.count = Some(existing.count.map(|c| c + 1).unwrap_or(2));
            }
            None => {
                let mut initial = weapon.clone();
                initial.count = weapon.count.filter(|&c| c > 0);
                index_of.insert(key, grouped.len());
                grouped.push(initial);
            }
        }
    }

    let (melee, ranged): (Vec<WeaponRecord>, Vec<WeaponRecord>) =
        grouped.into_iter().partition(|w| w.is_melee());
    GroupedWeapons { ranged, melee }
}
