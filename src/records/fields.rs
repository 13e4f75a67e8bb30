//! Canonical field resolvers for loosely shaped roster JSON
//!
//! Each canonical field owns an ordered alias list. Lookup tries every alias
//! in order: exact key first, then a case-insensitive match. Null values
//! count as absent.

use serde_json::{Map, Value};

/// A canonical field with an ordered list of accepted source keys
pub trait CanonicalField: Copy {
    fn aliases(self) -> &'static [&'static str];
}

/// Unit-level stats and collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitField {
    Id,
    Name,
    Models,
    CurrentModels,
    Toughness,
    Strength,
    ArmourSave,
    InvulnerableSave,
    BallisticSkill,
    WeaponSkill,
    Abilities,
    Keywords,
    Weapons,
    WeaponCarriers,
}

impl CanonicalField for UnitField {
    fn aliases(self) -> &'static [&'static str] {
        match self {
            UnitField::Id => &["id", "unitId"],
            UnitField::Name => &["name", "displayName"],
            UnitField::Models => &["models", "size", "model_count"],
            UnitField::CurrentModels => &["currentModels", "current_models"],
            UnitField::Toughness => &["toughness", "T", "Toughness"],
            UnitField::Strength => &["strength", "S"],
            UnitField::ArmourSave => &[
                "armor_save",
                "armour_save",
                "armourSave",
                "armorsave",
                "save",
                "SV",
                "Sv",
                "Armour Save",
                "Armour save",
            ],
            UnitField::InvulnerableSave => &[
                "invulnerable_save",
                "invulnerable",
                "invuln_save",
                "invuln",
                "Invulnerable Save",
                "Invulnerable",
            ],
            UnitField::BallisticSkill => &["ballistic_skill", "ballisticSkill", "BS"],
            UnitField::WeaponSkill => &["weapon_skill", "weaponSkill", "WS"],
            UnitField::Abilities => &["abilities"],
            UnitField::Keywords => &["keywords"],
            UnitField::Weapons => &["weapons"],
            UnitField::WeaponCarriers => &["weaponCarriers", "weapon_carriers"],
        }
    }
}

/// Weapon profile stats and carrier hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponField {
    Name,
    DisplayName,
    OptionLabel,
    Range,
    Type,
    Attacks,
    Skill,
    Strength,
    Ap,
    Damage,
    CarryCount,
    Count,
    SergeantOnly,
    LeaderOnly,
    Role,
    Tags,
    Keywords,
}

impl CanonicalField for WeaponField {
    fn aliases(self) -> &'static [&'static str] {
        match self {
            WeaponField::Name => &["name"],
            WeaponField::DisplayName => &["displayName", "display_name"],
            WeaponField::OptionLabel => &["optionLabel", "option_label"],
            WeaponField::Range => &["range"],
            WeaponField::Type => &["type", "weapon_type"],
            WeaponField::Attacks => &["attacks", "A"],
            WeaponField::Skill => &["skill", "BS", "WS"],
            WeaponField::Strength => &["strength", "S"],
            WeaponField::Ap => &["ap", "AP"],
            WeaponField::Damage => &["damage", "D"],
            WeaponField::CarryCount => &["carryCount", "carrierCount", "carry_count"],
            WeaponField::Count => &["count"],
            WeaponField::SergeantOnly => &["sergeantOnly", "sergeant_only"],
            WeaponField::LeaderOnly => &["leaderOnly", "leader_only"],
            WeaponField::Role => &["role"],
            WeaponField::Tags => &["tags"],
            WeaponField::Keywords => &["keywords"],
        }
    }
}

/// Resolve a canonical field against a JSON object
pub fn lookup<F: CanonicalField>(record: &Map<String, Value>, field: F) -> Option<&Value> {
    for alias in field.aliases() {
        if let Some(value) = record.get(*alias).filter(|v| !v.is_null()) {
            return Some(value);
        }
        let insensitive = record
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(alias) && !value.is_null());
        if let Some((_, value)) = insensitive {
            return Some(value);
        }
    }
    None
}

/// Non-negative integer from a number or numeric string; negatives clamp to 0
pub fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.min(u32::MAX as u64) as u32)
            } else if let Some(i) = n.as_i64() {
                Some(i.clamp(0, u32::MAX as i64) as u32)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.max(0.0).min(u32::MAX as f64) as u32)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i.clamp(0, u32::MAX as i64) as u32),
        _ => None,
    }
}

/// Single stat digit: numbers as-is, strings by their first digit ("3+" -> 3)
pub fn as_digit(value: &Value) -> Option<u8> {
    match value {
        Value::Number(_) => as_count(value).map(|v| v.min(u8::MAX as u32) as u8),
        Value::String(s) => s.chars().find_map(|c| c.to_digit(10)).map(|d| d as u8),
        _ => None,
    }
}

/// Text from a string or number
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Only an explicit `true` sets a flag
pub fn as_flag(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// String list from an array (non-strings skipped) or a single string
pub fn as_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_alias_order_wins() {
        let record = object(json!({"T": 5, "toughness": 4}));
        assert_eq!(lookup(&record, UnitField::Toughness), Some(&json!(4)));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let record = object(json!({"ARMOUR_SAVE": "3+"}));
        assert_eq!(lookup(&record, UnitField::ArmourSave), Some(&json!("3+")));
    }

    #[test]
    fn test_null_is_absent() {
        let record = object(json!({"toughness": null, "T": 6}));
        assert_eq!(lookup(&record, UnitField::Toughness), Some(&json!(6)));
    }

    #[test]
    fn test_coercions() {
        assert_eq!(as_count(&json!("4")), Some(4));
        assert_eq!(as_count(&json!(-2)), Some(0));
        assert_eq!(as_count(&json!("lots")), None);
        assert_eq!(as_digit(&json!("3+")), Some(3));
        assert_eq!(as_digit(&json!(4)), Some(4));
        assert!(as_flag(Some(&json!(true))));
        assert!(!as_flag(Some(&json!("true"))));
    }
}
