//! Pipeline and expected-value benchmarks
//!
//! ```bash
//! cargo bench --bench pipeline_bench
//! ```

use attack_helper::combat::{expected_outcome, AttackSession, ModifierState};
use attack_helper::core::{EngineConfig, Phase};
use attack_helper::dice::{parse_notation, SeededDice};
use attack_helper::records::UnitRecord;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

/// A horde unit so the hit and wound phases roll plenty of dice
fn horde(models: u32) -> UnitRecord {
    UnitRecord::from_json(&json!({
        "name": "Termagants",
        "models": models,
        "BS": "4+",
        "weapons": [{"name": "Fleshborer", "range": "18\"", "attacks": "D3+1", "S": 5, "AP": 0, "damage": "D3"}]
    }))
    .unwrap_or_default()
}

fn target() -> UnitRecord {
    UnitRecord::from_json(&json!({"name": "Intercessors", "T": 4, "Sv": "3+", "invuln": "5+"})).unwrap_or_default()
}

fn bench_roll_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("roll_all");
    for models in [10u32, 100, 1000] {
        let mut session = match AttackSession::for_weapon(EngineConfig::default(), horde(models), "Fleshborer") {
            Ok(session) => session,
            Err(_) => continue,
        };
        session.set_defender(Some(target()));
        session.set_modifiers(ModifierState {
            sustained: 1,
            lethal: true,
        });
        let mut dice = SeededDice::from_seed(42);

        group.bench_with_input(BenchmarkId::from_parameter(models), &models, |b, _| {
            b.iter(|| {
                let ledger = session.roll_all(&mut dice);
                black_box(ledger.get(Phase::Damage).map(|r| r.total))
            })
        });
    }
    group.finish();
}

fn bench_expected(c: &mut Criterion) {
    let attacker = horde(20);
    let defender = target();
    let weapon = attacker.weapons[0].clone();

    c.bench_function("expected_outcome", |b| {
        b.iter(|| expected_outcome(black_box(&attacker), Some(&weapon), Some(&defender), black_box(20)))
    });
}

fn bench_parse_notation(c: &mut Criterion) {
    c.bench_function("parse_notation", |b| {
        b.iter(|| {
            for text in ["D3", "2D6", "D6+1", "2D3+3", "3", "D6-1"] {
                black_box(parse_notation(black_box(text)));
            }
        })
    });
}

criterion_group!(benches, bench_roll_all, bench_expected, bench_parse_notation);
criterion_main!(benches);
