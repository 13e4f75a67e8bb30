//! The five-stage dice chain
//!
//! Attacks feed hits, hits feed wounds, wounds feed saves, unsaved wounds
//! feed damage. Rolling a phase first rolls any upstream phase that has no
//! result yet; upstream phases that already have a result are used as-is.

use crate::combat::ledger::PhaseLedger;
use crate::combat::modifiers::ModifierState;
use crate::combat::profile::AttackProfile;
use crate::combat::result::{MissingStat, PhaseExtras, PhaseResult};
use crate::core::config::EngineConfig;
use crate::core::types::{Phase, TargetNumber, CHECK_DIE};
use crate::dice::{DiceDescriptor, RandomSource};

/// Rolls phases for one resolved profile
#[derive(Debug, Clone, Copy)]
pub struct PhaseRoller<'a> {
    profile: &'a AttackProfile,
    modifiers: ModifierState,
    config: &'a EngineConfig,
}

impl<'a> PhaseRoller<'a> {
    pub fn new(profile: &'a AttackProfile, modifiers: ModifierState, config: &'a EngineConfig) -> Self {
        Self {
            profile,
            modifiers: modifiers.clamped(config),
            config,
        }
    }

    /// Roll `phase` (again), ensuring its upstream phases exist first
    pub fn roll<'l>(
        &self,
        ledger: &'l mut PhaseLedger,
        phase: Phase,
        dice: &mut dyn RandomSource,
    ) -> &'l PhaseResult {
        for upstream in Phase::ALL.into_iter().take(phase.index()) {
            if !ledger.is_rolled(upstream) {
                tracing::trace!(phase = %upstream, "rolling missing upstream phase");
                let result = self.roll_single(ledger, upstream, dice);
                ledger.record(result);
            }
        }
        let result = self.roll_single(ledger, phase, dice);
        ledger.record(result)
    }

    /// Fresh run of the whole sequence
    pub fn roll_all<'l>(&self, ledger: &'l mut PhaseLedger, dice: &mut dyn RandomSource) -> &'l PhaseLedger {
        ledger.clear();
        self.roll(ledger, Phase::Damage, dice);
        ledger
    }

    fn roll_single(&self, ledger: &PhaseLedger, phase: Phase, dice: &mut dyn RandomSource) -> PhaseResult {
        let upstream = phase.upstream().and_then(|up| ledger.get(up));
        let incoming = upstream.map(PhaseResult::carried).unwrap_or(0);

        let result = match phase {
            Phase::Attacks => self.attacks(dice),
            Phase::Hits => self.hits(incoming, dice),
            Phase::Wounds => {
                let auto = upstream.map(PhaseResult::auto_wounds).unwrap_or(0);
                self.wounds(incoming, auto, dice)
            }
            Phase::Saves => self.saves(incoming, dice),
            Phase::Damage => self.damage(incoming, dice),
        };

        tracing::debug!(
            phase = %phase,
            total = result.total,
            dice = result.rolls.len(),
            expr = %result.expr,
            "phase rolled"
        );
        result
    }

    fn attacks(&self, dice: &mut dyn RandomSource) -> PhaseResult {
        let models = self.profile.models_in_range;
        let attacks = &self.profile.attacks;

        let (total, rolls, per_model) = match attacks {
            DiceDescriptor::Fixed { value } => (value.saturating_mul(models), Vec::new(), Vec::new()),
            DiceDescriptor::Dice { .. } => {
                let mut rolls = Vec::new();
                let mut per_model = Vec::with_capacity(models as usize);
                for _ in 0..models {
                    let roll = attacks.roll(dice);
                    rolls.extend(roll.faces);
                    per_model.push(roll.total);
                }
                (per_model.iter().fold(0u32, |acc, &n| acc.saturating_add(n)), rolls, per_model)
            }
        };

        PhaseResult {
            phase: Phase::Attacks,
            expr: format!("{} × {} models", attacks, models),
            total,
            rolls,
            threshold: None,
            extras: PhaseExtras::Attacks { models, per_model },
            missing: None,
        }
    }

    fn hits(&self, attacks: u32, dice: &mut dyn RandomSource) -> PhaseResult {
        let ModifierState { sustained, lethal } = self.modifiers;
        let Some(target) = self.profile.hit_target else {
            return PhaseResult {
                phase: Phase::Hits,
                expr: self.check_expr(attacks, None),
                total: 0,
                rolls: Vec::new(),
                threshold: None,
                extras: PhaseExtras::Hits {
                    base_hits: 0,
                    crits: 0,
                    sustained,
                    lethal,
                    sustained_extra: 0,
                    auto_wounds: 0,
                },
                missing: Some(MissingStat::HitTarget),
            };
        };

        let rolls = self.roll_checks(attacks, dice);
        let critical = |face: u32| face >= self.config.critical_face;
        let crits = rolls.iter().filter(|&&face| critical(face)).count() as u32;
        let base_hits = rolls
            .iter()
            .filter(|&&face| target.passed_by(face) || critical(face))
            .count() as u32;

        // Lethal removes criticals first; sustained still counts every critical.
        let auto_wounds = if lethal { crits } else { 0 };
        let sustained_extra = crits.saturating_mul(sustained);
        let total = base_hits.saturating_sub(auto_wounds).saturating_add(sustained_extra);

        PhaseResult {
            phase: Phase::Hits,
            expr: self.check_expr(attacks, Some(target)),
            total,
            rolls,
            threshold: Some(target),
            extras: PhaseExtras::Hits {
                base_hits,
                crits,
                sustained,
                lethal,
                sustained_extra,
                auto_wounds,
            },
            missing: None,
        }
    }

    fn wounds(&self, hits: u32, auto_from_lethal: u32, dice: &mut dyn RandomSource) -> PhaseResult {
        let Some(target) = self.profile.wound_target else {
            return PhaseResult {
                phase: Phase::Wounds,
                expr: self.check_expr(hits, None),
                total: auto_from_lethal,
                rolls: Vec::new(),
                threshold: None,
                extras: PhaseExtras::Wounds {
                    rolled: 0,
                    auto_from_lethal,
                },
                missing: Some(MissingStat::WoundTarget),
            };
        };

        let rolls = self.roll_checks(hits, dice);
        let rolled = rolls.iter().filter(|&&face| target.passed_by(face)).count() as u32;

        PhaseResult {
            phase: Phase::Wounds,
            expr: self.check_expr(hits, Some(target)),
            total: rolled.saturating_add(auto_from_lethal),
            rolls,
            threshold: Some(target),
            extras: PhaseExtras::Wounds {
                rolled,
                auto_from_lethal,
            },
            missing: None,
        }
    }

    fn saves(&self, wounds: u32, dice: &mut dyn RandomSource) -> PhaseResult {
        let used = self.profile.save.used;
        let Some(target) = self.profile.save_target() else {
            return PhaseResult {
                phase: Phase::Saves,
                expr: format!("{} wounds, no save", wounds),
                total: 0,
                rolls: Vec::new(),
                threshold: None,
                extras: PhaseExtras::Saves {
                    saved: 0,
                    unsaved: wounds,
                    used,
                },
                missing: None,
            };
        };

        let rolls = self.roll_checks(wounds, dice);
        let saved = rolls.iter().filter(|&&face| target.passed_by(face)).count() as u32;

        PhaseResult {
            phase: Phase::Saves,
            expr: self.check_expr(wounds, Some(target)),
            total: saved,
            rolls,
            threshold: Some(target),
            extras: PhaseExtras::Saves {
                saved,
                unsaved: wounds - saved,
                used,
            },
            missing: None,
        }
    }

    fn damage(&self, unsaved: u32, dice: &mut dyn RandomSource) -> PhaseResult {
        let damage = &self.profile.damage;
        let mut rolls = Vec::new();
        let mut per_wound = Vec::with_capacity(unsaved as usize);
        for _ in 0..unsaved {
            let roll = damage.roll(dice);
            rolls.extend(roll.faces);
            per_wound.push(roll.total);
        }

        PhaseResult {
            phase: Phase::Damage,
            expr: format!("{} × {}", unsaved, damage),
            total: per_wound.iter().fold(0u32, |acc, &n| acc.saturating_add(n)),
            rolls,
            threshold: None,
            extras: PhaseExtras::Damage { per_wound },
            missing: None,
        }
    }

    fn roll_checks(&self, count: u32, dice: &mut dyn RandomSource) -> Vec<u32> {
        (0..count).map(|_| dice.roll_die(CHECK_DIE)).collect()
    }

    fn check_expr(&self, count: u32, target: Option<TargetNumber>) -> String {
        match target {
            Some(target) => format!("{}d{} >= {}", count, CHECK_DIE, target),
            None => format!("{}d{} >= missing", count, CHECK_DIE),
        }
    }
}
