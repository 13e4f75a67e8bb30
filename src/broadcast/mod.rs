//! Sharing rolled phases with the game log
//!
//! Sharing is best-effort. A sink that fails never rolls back or blocks the
//! session; the local results stay authoritative.

use crate::combat::result::{PhaseExtras, PhaseResult};
use crate::core::error::{AttackError, Result};
use crate::core::types::{Phase, Section, TargetNumber};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Who rolled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// A shared phase roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceBroadcast {
    pub phase: Phase,
    pub expr: String,
    pub total: u32,
    pub rolls: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<TargetNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<PhaseExtras>,
    pub weapon: String,
    pub section: Section,
    pub player_id: String,
    pub player_name: String,
}

impl DiceBroadcast {
    pub fn from_result(result: &PhaseResult, weapon: &str, section: Section, player: &Player) -> Self {
        Self {
            phase: result.phase,
            expr: result.expr.clone(),
            total: result.total,
            rolls: result.rolls.clone(),
            threshold: result.threshold,
            extra: Some(result.extras.clone()),
            weapon: weapon.to_string(),
            section,
            player_id: player.id.clone(),
            player_name: player.name.clone(),
        }
    }
}

/// Records accepted by the game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameUpdate {
    Dice(DiceBroadcast),
}

/// Destination for shared updates
pub trait GameLog {
    fn append(&mut self, update: &GameUpdate) -> Result<()>;
}

/// In-memory log, mostly for tests and the harness
#[derive(Debug, Clone, Default)]
pub struct MemoryGameLog {
    updates: Vec<GameUpdate>,
}

impl MemoryGameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[GameUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl GameLog for MemoryGameLog {
    fn append(&mut self, update: &GameUpdate) -> Result<()> {
        self.updates.push(update.clone());
        Ok(())
    }
}

/// One JSON object per line
#[derive(Debug)]
pub struct JsonLinesGameLog<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesGameLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GameLog for JsonLinesGameLog<W> {
    fn append(&mut self, update: &GameUpdate) -> Result<()> {
        serde_json::to_writer(&mut self.writer, update)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Append an update; failures are logged and reported as `false`
pub fn share_best_effort(log: &mut dyn GameLog, update: &GameUpdate) -> bool {
    match log.append(update) {
        Ok(()) => true,
        Err(err) => {
            let phase = match update {
                GameUpdate::Dice(dice) => dice.phase,
            };
            tracing::warn!(%phase, error = %err, "failed to share roll; keeping local result");
            false
        }
    }
}

/// Sink that refuses every update
#[derive(Debug, Clone, Default)]
pub struct RejectingGameLog {
    pub reason: String,
}

impl GameLog for RejectingGameLog {
    fn append(&mut self, _update: &GameUpdate) -> Result<()> {
        Err(AttackError::LogRejected(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> PhaseResult {
        PhaseResult {
            phase: Phase::Hits,
            expr: "5d6 >= 3+".into(),
            total: 3,
            rolls: vec![1, 3, 6, 2, 4],
            threshold: TargetNumber::within_range(3),
            extras: PhaseExtras::Hits {
                base_hits: 3,
                crits: 1,
                sustained: 0,
                lethal: false,
                sustained_extra: 0,
                auto_wounds: 0,
            },
            missing: None,
        }
    }

    fn player() -> Player {
        Player {
            id: "p1".into(),
            name: "Alice".into(),
        }
    }

    #[test]
    fn test_broadcast_shape() {
        let update = GameUpdate::Dice(DiceBroadcast::from_result(
            &result(),
            "Bolt rifle",
            Section::Ranged,
            &player(),
        ));
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["type"], "dice");
        assert_eq!(json["phase"], "hits");
        assert_eq!(json["expr"], "5d6 >= 3+");
        assert_eq!(json["threshold"], 3);
        assert_eq!(json["section"], "ranged");
        assert_eq!(json["playerId"], "p1");
        assert_eq!(json["playerName"], "Alice");
        assert_eq!(json["extra"]["crits"], 1);
    }

    #[test]
    fn test_threshold_omitted_when_absent() {
        let mut attacks = result();
        attacks.threshold = None;
        let update = GameUpdate::Dice(DiceBroadcast::from_result(&attacks, "x", Section::Melee, &player()));
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("threshold").is_none());
    }

    #[test]
    fn test_json_lines_log() {
        let mut log = JsonLinesGameLog::new(Vec::new());
        let update = GameUpdate::Dice(DiceBroadcast::from_result(&result(), "x", Section::Ranged, &player()));
        assert!(share_best_effort(&mut log, &update));
        assert!(share_best_effort(&mut log, &update));

        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let decoded: GameUpdate = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, update);
    }

    #[test]
    fn test_rejecting_log_is_not_fatal() {
        let mut log = RejectingGameLog {
            reason: "offline".into(),
        };
        let update = GameUpdate::Dice(DiceBroadcast::from_result(&result(), "x", Section::Ranged, &player()));
        assert!(!share_best_effort(&mut log, &update));
    }
}
