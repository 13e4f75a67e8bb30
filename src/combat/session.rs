//! One attacker/weapon/defender selection and its phase results
//!
//! The session is owned by the caller and passed around explicitly. Any
//! change of selection throws away the recorded phases.

use crate::combat::carriers::resolve_carrier_count;
use crate::combat::expected::ExpectedOutcome;
use crate::combat::ledger::{PhaseLedger, PhaseSlot};
use crate::combat::modifiers::ModifierState;
use crate::combat::pipeline::PhaseRoller;
use crate::combat::profile::AttackProfile;
use crate::combat::result::PhaseResult;
use crate::core::config::EngineConfig;
use crate::core::error::{AttackError, Result};
use crate::core::types::{Phase, Section};
use crate::dice::RandomSource;
use crate::records::{UnitRecord, WeaponRecord};

#[derive(Debug, Clone)]
pub struct AttackSession {
    config: EngineConfig,
    attacker: UnitRecord,
    section: Section,
    weapon: WeaponRecord,
    defender: Option<UnitRecord>,
    models_in_range: u32,
    modifiers: ModifierState,
    ledger: PhaseLedger,
}

impl AttackSession {
    /// Start a session; models in range default to the weapon's carriers
    ///
    /// Fails with [`AttackError::InvalidConfig`] when the config does not validate.
    pub fn new(
        config: EngineConfig,
        attacker: UnitRecord,
        section: Section,
        weapon: WeaponRecord,
    ) -> Result<Self> {
        config.validate().map_err(AttackError::InvalidConfig)?;
        let models_in_range = resolve_carrier_count(&attacker, &weapon);
        let modifiers = ModifierState::from_weapon(&weapon, &config);
        Ok(Self {
            config,
            attacker,
            section,
            weapon,
            defender: None,
            models_in_range,
            modifiers,
            ledger: PhaseLedger::new(),
        })
    }

    /// Start a session on a weapon picked by name from the attacker's grouped profiles
    pub fn for_weapon(config: EngineConfig, attacker: UnitRecord, weapon_name: &str) -> Result<Self> {
        let grouped = attacker.grouped_weapons();
        let (section, weapon) = grouped
            .find(weapon_name)
            .map(|(section, weapon)| (section, weapon.clone()))
            .ok_or_else(|| AttackError::WeaponNotFound(weapon_name.to_string()))?;
        Self::new(config, attacker, section, weapon)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn attacker(&self) -> &UnitRecord {
        &self.attacker
    }

    pub fn weapon(&self) -> &WeaponRecord {
        &self.weapon
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn defender(&self) -> Option<&UnitRecord> {
        self.defender.as_ref()
    }

    pub fn models_in_range(&self) -> u32 {
        self.models_in_range
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    pub fn ledger(&self) -> &PhaseLedger {
        &self.ledger
    }

    /// Switch weapon (and section); resets models in range and modifiers
    pub fn select_weapon(&mut self, section: Section, weapon: WeaponRecord) {
        self.models_in_range = resolve_carrier_count(&self.attacker, &weapon);
        self.modifiers = ModifierState::from_weapon(&weapon, &self.config);
        self.section = section;
        self.weapon = weapon;
        self.selection_changed("weapon");
    }

    pub fn set_attacker(&mut self, attacker: UnitRecord) {
        self.models_in_range = resolve_carrier_count(&attacker, &self.weapon);
        self.attacker = attacker;
        self.selection_changed("attacker");
    }

    pub fn set_defender(&mut self, defender: Option<UnitRecord>) {
        self.defender = defender;
        self.selection_changed("defender");
    }

    /// Models actually in range; never below 1. Recorded phases are kept.
    pub fn set_models_in_range(&mut self, models: u32) {
        self.models_in_range = models.max(1);
    }

    /// Replace modifiers; sustained is capped by the config
    pub fn set_modifiers(&mut self, modifiers: ModifierState) {
        self.modifiers = modifiers.clamped(&self.config);
    }

    /// Resolved targets and descriptors for the current selection
    pub fn profile(&self) -> AttackProfile {
        AttackProfile::resolve(
            &self.attacker,
            &self.weapon,
            self.section,
            self.defender.as_ref(),
            self.models_in_range,
        )
    }

    /// Roll a phase; downstream results are discarded, upstream ones kept
    pub fn roll(&mut self, phase: Phase, dice: &mut dyn RandomSource) -> &PhaseResult {
        let profile = self.profile();
        let roller = PhaseRoller::new(&profile, self.modifiers, &self.config);
        roller.roll(&mut self.ledger, phase, dice)
    }

    /// Fresh roll of all five phases
    pub fn roll_all(&mut self, dice: &mut dyn RandomSource) -> &PhaseLedger {
        let profile = self.profile();
        let roller = PhaseRoller::new(&profile, self.modifiers, &self.config);
        roller.roll_all(&mut self.ledger, dice)
    }

    pub fn result(&self, phase: Phase) -> Option<&PhaseResult> {
        self.ledger.get(phase)
    }

    pub fn slot(&self, phase: Phase) -> PhaseSlot<'_> {
        self.ledger.slot(phase)
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    /// Expected outcome; reads the selection only and never touches results
    pub fn expected(&self) -> ExpectedOutcome {
        ExpectedOutcome::from_profile(&self.profile())
    }

    fn selection_changed(&mut self, what: &str) {
        if !self.ledger.is_empty() {
            tracing::debug!(changed = what, "selection changed; clearing phase results");
        }
        self.ledger.clear();
    }
}
