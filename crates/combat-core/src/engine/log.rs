//! Structured battle log for UI layers and file sinks.

use crate::state::CombatantId;

/// What a log entry records.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    BattleStarted,
    RoundStarted,
    PlayerTurn,
    Move,
    Attack,
    /// The combatant had nothing it could do.
    Wait,
    /// The combatant wanted to act but was blocked (path, AP, range).
    Blocked,
    Defeated,
    Revived,
    GameOver,
}

/// One ordered log record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u64,
    pub round: u32,
    pub actor: Option<CombatantId>,
    pub kind: EventKind,
    pub detail: String,
}

/// Append-only battle log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        tracing::debug!(
            turn = entry.turn,
            actor = entry.actor.as_ref().map(CombatantId::as_str),
            kind = %entry.kind,
            detail = %entry.detail,
            "battle log"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Entries of one kind, in order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Entries appended after the first `start`.
    pub fn since(&self, start: usize) -> &[LogEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }
}
