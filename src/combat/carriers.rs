//! How many models in a unit carry a given weapon

use crate::dice::notation::number;
use crate::records::{UnitRecord, WeaponRecord};
use nom::character::complete::{multispace0, multispace1, one_of};
use nom::{IResult, Parser};

/// Which precedence rule produced a carrier count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierRule {
    UnitMap,
    WeaponCount,
    LeaderOnly,
    LabelPrefix,
    AllModels,
}

/// Carrier count for a weapon, always within `[1, current model count]`
pub fn resolve_carrier_count(unit: &UnitRecord, weapon: &WeaponRecord) -> u32 {
    resolve_carrier_rule(unit, weapon).0
}

/// Carrier count plus the rule that decided it
///
/// Rules short-circuit in order: explicit unit mapping, weapon
/// `carryCount`/`count`, leader-only markers, an "Nx " label prefix, and
/// finally every model present.
pub fn resolve_carrier_rule(unit: &UnitRecord, weapon: &WeaponRecord) -> (u32, CarrierRule) {
    let present = unit.current_model_count();

    let (raw, rule) = if let Some(&mapped) = unit.weapon_carriers.get(&weapon.name) {
        (mapped, CarrierRule::UnitMap)
    } else if let Some(count) = weapon.carry_count.or(weapon.count) {
        (count, CarrierRule::WeaponCount)
    } else if weapon.is_leader_only() {
        (1, CarrierRule::LeaderOnly)
    } else if let Some(prefixed) = label_prefix(weapon.label()) {
        (prefixed, CarrierRule::LabelPrefix)
    } else {
        (present, CarrierRule::AllModels)
    };

    let carriers = raw.clamp(1, present);
    tracing::trace!(
        weapon = %weapon.name,
        ?rule,
        raw,
        carriers,
        "resolved carrier count"
    );
    (carriers, rule)
}

fn prefix(input: &str) -> IResult<&str, u32> {
    let (rest, (count, _, _, _)) = (number, multispace0, one_of("xX"), multispace1).parse(input)?;
    Ok((rest, count))
}

/// "2x Chainsword" -> 2
fn label_prefix(label: &str) -> Option<u32> {
    prefix(label.trim()).ok().map(|(_, count)| count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(models: u32) -> UnitRecord {
        UnitRecord {
            models,
            ..UnitRecord::default()
        }
    }

    fn chainsword() -> WeaponRecord {
        WeaponRecord {
            name: "Astartes Chainsword".into(),
            ..WeaponRecord::default()
        }
    }

    #[test]
    fn test_unit_map_capped_to_present_models() {
        let mut squad = unit(5);
        squad.current_models = Some(4);
        squad.weapon_carriers.insert("Astartes Chainsword".into(), 7);
        assert_eq!(
            resolve_carrier_rule(&squad, &chainsword()),
            (4, CarrierRule::UnitMap)
        );
    }

    #[test]
    fn test_weapon_carry_count() {
        let weapon = WeaponRecord {
            carry_count: Some(3),
            ..chainsword()
        };
        assert_eq!(resolve_carrier_count(&unit(10), &weapon), 3);
    }

    #[test]
    fn test_leader_only_markers() {
        let squad = unit(10);
        let sergeant = WeaponRecord {
            sergeant_only: true,
            ..chainsword()
        };
        let leader = WeaponRecord {
            leader_only: true,
            ..chainsword()
        };
        let role = WeaponRecord {
            role: Some("sergeant".into()),
            ..chainsword()
        };
        let tagged = WeaponRecord {
            tags: vec!["sergeant-only".into()],
            ..chainsword()
        };
        for weapon in [sergeant, leader, role, tagged] {
            assert_eq!(
                resolve_carrier_rule(&squad, &weapon),
                (1, CarrierRule::LeaderOnly)
            );
        }
    }

    #[test]
    fn test_label_prefix() {
        let squad = unit(10);
        let named = WeaponRecord {
            name: "2x Astartes Chainsword".into(),
            ..WeaponRecord::default()
        };
        let displayed = WeaponRecord {
            display_name: Some("3X  Astartes Chainsword".into()),
            ..chainsword()
        };
        assert_eq!(resolve_carrier_count(&squad, &named), 2);
        assert_eq!(resolve_carrier_count(&squad, &displayed), 3);
        assert_eq!(label_prefix("2xChainsword"), None);
        assert_eq!(label_prefix("Chainsword 2x "), None);
    }

    #[test]
    fn test_blank_display_name_reads_name_prefix() {
        let weapon = WeaponRecord {
            name: "2x Chainsword".into(),
            display_name: Some(String::new()),
            ..WeaponRecord::default()
        };
        assert_eq!(
            resolve_carrier_rule(&unit(10), &weapon),
            (2, CarrierRule::LabelPrefix)
        );
    }

    #[test]
    fn test_fallback_all_models() {
        assert_eq!(
            resolve_carrier_rule(&unit(6), &chainsword()),
            (6, CarrierRule::AllModels)
        );
    }

    #[test]
    fn test_zero_counts_floor_at_one() {
        let weapon = WeaponRecord {
            count: Some(0),
            ..chainsword()
        };
        assert_eq!(resolve_carrier_count(&unit(5), &weapon), 1);
        assert_eq!(resolve_carrier_count(&unit(0), &chainsword()), 1);
    }
}
