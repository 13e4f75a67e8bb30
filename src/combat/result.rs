//! Per-phase roll results, shaped for display and the game log

use crate::combat::targets::SaveKind;
use crate::core::types::{Phase, TargetNumber};
use serde::{Deserialize, Serialize};

/// A stat the phase needed but could not determine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingStat {
    HitTarget,
    WoundTarget,
}

/// Phase-specific breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhaseExtras {
    #[serde(rename_all = "camelCase")]
    Attacks {
        models: u32,
        /// Each model's sub-total when the attack count is rolled
        per_model: Vec<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Hits {
        /// Dice that met the target, criticals included
        base_hits: u32,
        crits: u32,
        sustained: u32,
        lethal: bool,
        sustained_extra: u32,
        auto_wounds: u32,
    },
    #[serde(rename_all = "camelCase")]
    Wounds {
        rolled: u32,
        auto_from_lethal: u32,
    },
    #[serde(rename_all = "camelCase")]
    Saves {
        saved: u32,
        unsaved: u32,
        used: Option<SaveKind>,
    },
    #[serde(rename_all = "camelCase")]
    Damage {
        per_wound: Vec<u32>,
    },
}

/// Outcome of one phase
///
/// Created fresh every time the phase is rolled. `rolls` holds the raw
/// faces in roll order and is empty when nothing was rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase: Phase,
    /// Human-readable formula, e.g. "5d6 >= 3+"
    pub expr: String,
    pub total: u32,
    pub rolls: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<TargetNumber>,
    pub extras: PhaseExtras,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingStat>,
}

impl PhaseResult {
    /// The count handed to the next phase
    ///
    /// Hits pass on only the hits that still need a wound roll; saves pass
    /// on the unsaved wounds.
    pub fn carried(&self) -> u32 {
        match &self.extras {
            PhaseExtras::Saves { unsaved, .. } => *unsaved,
            _ => self.total,
        }
    }

    /// Wounds granted by Lethal Hits; zero for every other phase
    pub fn auto_wounds(&self) -> u32 {
        match &self.extras {
            PhaseExtras::Hits { auto_wounds, .. } => *auto_wounds,
            _ => 0,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }
}
