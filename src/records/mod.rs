//! Unit and weapon records consumed from the roster collaborator

pub mod fields;
pub mod unit;
pub mod weapon;

pub use fields::{lookup, CanonicalField, UnitField, WeaponField};
pub use unit::{infer_invulnerable, parse_save, Ability, UnitRecord};
pub use weapon::{
    group_weapons, mentions_lethal_hits, parse_ap, parse_sustained_hits, GroupedWeapons,
    WeaponRecord, MELEE,
};
