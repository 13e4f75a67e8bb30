//! Headless Attack Simulator
//!
//! Loads a JSON scenario, prints the expected outcome and a rolled attack
//! sequence, and optionally appends each rolled phase to a JSON-lines log.

use attack_helper::broadcast::{share_best_effort, DiceBroadcast, GameUpdate, JsonLinesGameLog, Player};
use attack_helper::combat::{AttackSession, ExpectedOutcome, ModifierState, PhaseResult};
use attack_helper::core::error::{AttackError, Result};
use attack_helper::core::EngineConfig;
use attack_helper::dice::{DiceTray, SeededDice, TrayRoll};
use attack_helper::records::UnitRecord;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Headless Attack Simulator - expected and rolled attack sequences
#[derive(Parser, Debug)]
#[command(name = "attack_sim")]
#[command(about = "Resolve one attack from a JSON scenario")]
struct Args {
    /// Scenario file (attacker, defender, weapon, modifiers)
    scenario: PathBuf,

    /// Engine config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Share phrase hashed into a seed (ignored when --seed is given)
    #[arg(long)]
    phrase: Option<String>,

    /// What to print: expected, roll, or both
    #[arg(long, default_value = "both")]
    mode: String,

    /// Append each rolled phase to this JSON-lines game log
    #[arg(long)]
    log: Option<PathBuf>,

    /// Override the models in range
    #[arg(long)]
    models: Option<u32>,

    /// Extra free-form rolls, e.g. --tray 2d6 --tray "d3+1"
    #[arg(long)]
    tray: Vec<String>,
}

/// Scenario file layout
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    attacker: Value,
    #[serde(default)]
    defender: Option<Value>,
    weapon: String,
    #[serde(default)]
    models_in_range: Option<u32>,
    #[serde(default)]
    modifiers: Option<ModifierState>,
    #[serde(default)]
    player: Option<Player>,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimOutput {
    weapon: String,
    section: String,
    models_in_range: u32,
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<ExpectedOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    phases: Vec<PhaseResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tray: Vec<TrayRoll>,
    shared: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.validate().map_err(AttackError::InvalidConfig)?;

    let scenario: Scenario = serde_json::from_str(&std::fs::read_to_string(&args.scenario)?)?;
    let attacker = UnitRecord::from_json(&scenario.attacker)?;
    let defender = scenario.defender.as_ref().map(UnitRecord::from_json).transpose()?;

    let mut session = AttackSession::for_weapon(config, attacker, &scenario.weapon)?;
    session.set_defender(defender);
    if let Some(models) = args.models.or(scenario.models_in_range) {
        session.set_models_in_range(models);
    }
    if let Some(modifiers) = scenario.modifiers {
        session.set_modifiers(modifiers);
    }

    let mut dice = match (args.seed, &args.phrase) {
        (Some(seed), _) => SeededDice::from_seed(seed),
        (None, Some(phrase)) => SeededDice::from_phrase(phrase),
        (None, None) => SeededDice::from_entropy(),
    };
    tracing::info!(weapon = %session.weapon().label(), seed = dice.seed(), "resolving attack");

    let want_expected = args.mode != "roll";
    let want_roll = args.mode != "expected";

    let expected = want_expected.then(|| session.expected());
    let phases: Vec<PhaseResult> = if want_roll {
        session.roll_all(&mut dice).results().cloned().collect()
    } else {
        Vec::new()
    };

    let mut tray = DiceTray::new(session.config().tray_history_limit);
    for expr in &args.tray {
        tray.roll(expr, &mut dice);
    }

    let mut shared = 0;
    if let Some(path) = &args.log {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut log = JsonLinesGameLog::new(file);
        let player = scenario.player.clone().unwrap_or_default();
        let weapon = session.weapon().label().to_string();
        for result in &phases {
            let update = GameUpdate::Dice(DiceBroadcast::from_result(result, &weapon, session.section(), &player));
            if share_best_effort(&mut log, &update) {
                shared += 1;
            }
        }
    }

    let output = SimOutput {
        weapon: session.weapon().label().to_string(),
        section: session.section().to_string(),
        models_in_range: session.models_in_range(),
        seed: dice.seed(),
        expected,
        phases,
        tray: tray.history().cloned().collect(),
        shared,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
