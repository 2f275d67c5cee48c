//! Battle outcome tracking.
//!
//! The tracker keeps an alive count per team and derives the verdict after
//! every mutation. The first terminal verdict notifies subscribers and locks
//! the tracker; nothing afterwards can change or re-announce it.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::state::TeamId;

/// Verdict of a battle from the player's point of view.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ongoing,
    Victory,
    Defeat,
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Observer notified once with the terminal verdict.
pub type OutcomeSubscriber = Box<dyn FnMut(Outcome) + Send>;

/// Observer-based win/lose/draw detector over per-team alive counts.
pub struct OutcomeTracker {
    player_team: TeamId,
    enemy_teams: Vec<TeamId>,
    counts: BTreeMap<TeamId, u32>,
    outcome: Outcome,
    subscribers: Vec<OutcomeSubscriber>,
}

impl OutcomeTracker {
    /// Creates a tracker from initial alive counts.
    ///
    /// Teams missing from `counts` start at zero. The verdict is not computed
    /// until the first mutation or [`refresh`](Self::refresh), so subscribers
    /// attached right after construction hear about an already-decided roster.
    pub fn new(
        player_team: TeamId,
        enemy_teams: Vec<TeamId>,
        counts: impl IntoIterator<Item = (TeamId, u32)>,
    ) -> Self {
        Self {
            player_team,
            enemy_teams,
            counts: counts.into_iter().collect(),
            outcome: Outcome::Ongoing,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(Outcome) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn player_team(&self) -> &TeamId {
        &self.player_team
    }

    pub fn enemy_teams(&self) -> &[TeamId] {
        &self.enemy_teams
    }

    pub fn alive_count(&self, team: &TeamId) -> u32 {
        self.counts.get(team).copied().unwrap_or(0)
    }

    /// A combatant of `team` died. Counts never go below zero.
    pub fn on_unit_defeated(&mut self, team: &TeamId) -> Outcome {
        if self.is_terminal() {
            return self.outcome;
        }
        let count = self.counts.entry(team.clone()).or_insert(0);
        *count = count.saturating_sub(1);
        debug!(team = %team, alive = *count, "unit defeated");
        self.evaluate()
    }

    /// A combatant of `team` came back.
    pub fn on_unit_revived(&mut self, team: &TeamId) -> Outcome {
        if self.is_terminal() {
            return self.outcome;
        }
        let count = self.counts.entry(team.clone()).or_insert(0);
        *count += 1;
        debug!(team = %team, alive = *count, "unit revived");
        self.evaluate()
    }

    /// Ends an undecided battle as a draw (e.g. round limit reached).
    pub fn declare_draw(&mut self) -> Outcome {
        if !self.is_terminal() {
            self.settle(Outcome::Draw);
        }
        self.outcome
    }

    /// Recomputes the verdict without changing any count.
    pub fn refresh(&mut self) -> Outcome {
        self.evaluate()
    }

    fn evaluate(&mut self) -> Outcome {
        if self.is_terminal() {
            return self.outcome;
        }
        let verdict = if self.alive_count(&self.player_team) == 0 {
            Outcome::Defeat
        } else if self
            .enemy_teams
            .iter()
            .all(|team| self.alive_count(team) == 0)
        {
            Outcome::Victory
        } else {
            Outcome::Ongoing
        };
        if verdict.is_terminal() {
            self.settle(verdict);
        }
        self.outcome
    }

    fn settle(&mut self, verdict: Outcome) {
        self.outcome = verdict;
        info!(outcome = %verdict, "battle decided");
        for subscriber in self.subscribers.iter_mut() {
            subscriber(verdict);
        }
    }
}

impl fmt::Debug for OutcomeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeTracker")
            .field("player_team", &self.player_team)
            .field("enemy_teams", &self.enemy_teams)
            .field("counts", &self.counts)
            .field("outcome", &self.outcome)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
