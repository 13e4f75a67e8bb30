//! Combat resolution: targets, carriers, the dice pipeline and expected value

pub mod carriers;
pub mod expected;
pub mod ledger;
pub mod modifiers;
pub mod pipeline;
pub mod profile;
pub mod result;
pub mod session;
pub mod targets;

pub use carriers::{resolve_carrier_count, resolve_carrier_rule, CarrierRule};
pub use expected::{expected_outcome, ExpectedOutcome};
pub use ledger::{PhaseLedger, PhaseSlot};
pub use modifiers::ModifierState;
pub use pipeline::PhaseRoller;
pub use profile::AttackProfile;
pub use result::{MissingStat, PhaseExtras, PhaseResult};
pub use session::AttackSession;
pub use targets::{
    apply_ap, apply_ap_to_save, best_save_target_after_ap, compute_defender_save, defender_save,
    effective_strength, explain_wound_rule, probability_from_target, resolve_hit_target,
    wound_target, SaveBreakdown, SaveKind,
};
