//! Round-robin turn order.

use tracing::debug;

use crate::state::{ApLedger, CombatantId};

/// Ordered queue of combatants with a cursor on the one acting now.
///
/// `turn` counts every advance; `round` counts passes through the queue.
/// The cursor always indexes a live entry unless the queue is empty.
#[derive(Clone, Debug)]
pub struct TurnSequencer {
    queue: Vec<CombatantId>,
    cursor: usize,
    turn: u64,
    round: u32,
}

impl TurnSequencer {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            cursor: 0,
            turn: 1,
            round: 1,
        }
    }

    /// Appends `id` to the end of the order. Duplicates are ignored.
    pub fn add(&mut self, id: CombatantId) -> bool {
        if self.queue.contains(&id) {
            return false;
        }
        self.queue.push(id);
        true
    }

    /// Removes `id` wherever it sits.
    ///
    /// Entries ahead of the cursor are unaffected. Removing an entry behind
    /// the cursor shifts it back so the current combatant stays current.
    /// Removing the current entry leaves the cursor on the next one; when
    /// that wraps past the end, a new round starts.
    pub fn remove(&mut self, id: &CombatantId) -> bool {
        let Some(index) = self.queue.iter().position(|queued| queued == id) else {
            return false;
        };
        self.queue.remove(index);

        if self.queue.is_empty() {
            self.cursor = 0;
        } else if index < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.queue.len() {
            self.cursor = 0;
            self.round += 1;
            debug!(round = self.round, "round wrapped by removal");
        }
        true
    }

    pub fn get_current(&self) -> Option<&CombatantId> {
        self.queue.get(self.cursor)
    }

    /// Moves to the next combatant. Returns true when a new round starts.
    pub fn advance(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        self.turn += 1;
        self.cursor += 1;
        if self.cursor >= self.queue.len() {
            self.cursor = 0;
            self.round += 1;
            debug!(round = self.round, "new round");
            return true;
        }
        false
    }

    /// Whether the current combatant can afford `cost`.
    pub fn can_act(&self, ledger: &ApLedger, cost: u32) -> bool {
        self.get_current()
            .is_some_and(|id| ledger.can_spend(id, cost))
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, id: &CombatantId) -> bool {
        self.queue.contains(id)
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.queue
    }
}

impl Default for TurnSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> CombatantId {
        CombatantId::new(value)
    }

    fn abc() -> TurnSequencer {
        let mut seq = TurnSequencer::new();
        for name in ["a", "b", "c"] {
            seq.add(id(name));
        }
        seq
    }

    #[test]
    fn advance_wraps_and_counts_rounds() {
        let mut seq = abc();
        assert_eq!(seq.get_current(), Some(&id("a")));
        assert!(!seq.advance());
        assert!(!seq.advance());
        assert_eq!(seq.get_current(), Some(&id("c")));
        assert!(seq.advance());
        assert_eq!(seq.get_current(), Some(&id("a")));
        assert_eq!(seq.round(), 2);
        assert_eq!(seq.turn(), 4);
    }

    #[test]
    fn removing_upcoming_entry_skips_it_cleanly() {
        let mut seq = abc();
        assert!(seq.remove(&id("b")));
        assert_eq!(seq.get_current(), Some(&id("a")));
        seq.advance();
        assert_eq!(seq.get_current(), Some(&id("c")));
        seq.advance();
        assert_eq!(seq.get_current(), Some(&id("a")));
    }

    #[test]
    fn removing_earlier_entry_keeps_current() {
        let mut seq = abc();
        seq.advance();
        seq.advance();
        assert!(seq.remove(&id("a")));
        assert_eq!(seq.get_current(), Some(&id("c")));
        seq.advance();
        assert_eq!(seq.get_current(), Some(&id("b")));
    }

    #[test]
    fn removing_current_lands_on_next_without_double_advance() {
        let mut seq = abc();
        seq.advance();
        assert!(seq.remove(&id("b")));
        assert_eq!(seq.get_current(), Some(&id("c")));
        seq.advance();
        assert_eq!(seq.get_current(), Some(&id("a")));
    }

    #[test]
    fn removing_current_tail_wraps_to_a_new_round() {
        let mut seq = abc();
        seq.advance();
        seq.advance();
        seq.remove(&id("c"));
        assert_eq!(seq.get_current(), Some(&id("a")));
        assert_eq!(seq.round(), 2);
    }

    #[test]
    fn empty_queue_has_no_current() {
        let mut seq = TurnSequencer::new();
        assert_eq!(seq.get_current(), None);
        assert!(!seq.advance());
        assert_eq!(seq.turn(), 1);

        seq.add(id("solo"));
        seq.remove(&id("solo"));
        assert!(seq.is_empty());
        assert!(!seq.remove(&id("solo")));
    }

    #[test]
    fn can_act_delegates_to_ledger() {
        let mut seq = abc();
        let mut ledger = ApLedger::new(3);
        ledger.register_default(id("a"));
        assert!(seq.can_act(&ledger, 3));
        assert!(!seq.can_act(&ledger, 4));
        seq.advance();
        assert!(!seq.can_act(&ledger, 0));
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut seq = abc();
        assert!(!seq.add(id("a")));
        assert_eq!(seq.len(), 3);
    }
}
