//! Phase ledger: a small state machine over the five phases
//!
//! Each phase is either `NotRolled` or `Rolled`. Rolled phases always form
//! a prefix of the sequence: recording a phase resets every downstream
//! phase to `NotRolled`, and an upstream phase is never modified by a
//! downstream roll.

use crate::combat::result::PhaseResult;
use crate::core::types::Phase;

/// View of one phase's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSlot<'a> {
    NotRolled,
    Rolled(&'a PhaseResult),
}

/// Results for the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseLedger {
    slots: [Option<PhaseResult>; 5],
}

impl PhaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, phase: Phase) -> PhaseSlot<'_> {
        match &self.slots[phase.index()] {
            Some(result) => PhaseSlot::Rolled(result),
            None => PhaseSlot::NotRolled,
        }
    }

    pub fn get(&self, phase: Phase) -> Option<&PhaseResult> {
        self.slots[phase.index()].as_ref()
    }

    pub fn is_rolled(&self, phase: Phase) -> bool {
        self.slots[phase.index()].is_some()
    }

    /// First phase still waiting for a roll
    pub fn next_unrolled(&self) -> Option<Phase> {
        Phase::ALL.into_iter().find(|&phase| !self.is_rolled(phase))
    }

    /// Store a fresh result and reset everything downstream of it
    pub fn record(&mut self, result: PhaseResult) -> &PhaseResult {
        let index = result.phase.index();
        for slot in &mut self.slots[index + 1..] {
            *slot = None;
        }
        self.slots[index].insert(result)
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Rolled results in phase order
    pub fn results(&self) -> impl Iterator<Item = &PhaseResult> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::result::PhaseExtras;

    fn result(phase: Phase, total: u32) -> PhaseResult {
        PhaseResult {
            phase,
            expr: String::new(),
            total,
            rolls: Vec::new(),
            threshold: None,
            extras: PhaseExtras::Damage { per_wound: Vec::new() },
            missing: None,
        }
    }

    #[test]
    fn test_starts_not_rolled() {
        let ledger = PhaseLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.slot(Phase::Hits), PhaseSlot::NotRolled);
        assert_eq!(ledger.next_unrolled(), Some(Phase::Attacks));
    }

    #[test]
    fn test_record_resets_downstream_only() {
        let mut ledger = PhaseLedger::new();
        for (i, phase) in Phase::ALL.into_iter().enumerate() {
            ledger.record(result(phase, i as u32));
        }
        assert_eq!(ledger.next_unrolled(), None);

        ledger.record(result(Phase::Hits, 99));

        assert_eq!(ledger.get(Phase::Attacks).map(|r| r.total), Some(0));
        assert_eq!(ledger.get(Phase::Hits).map(|r| r.total), Some(99));
        assert!(!ledger.is_rolled(Phase::Wounds));
        assert!(!ledger.is_rolled(Phase::Damage));
        assert_eq!(ledger.results().count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut ledger = PhaseLedger::new();
        ledger.record(result(Phase::Attacks, 4));
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
