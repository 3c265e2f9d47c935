//! Undo log for table actions
//!
//! Every state change the table makes is recorded here together with the
//! data needed to invert it. User-level operations (one key press, one drop)
//! mark a checkpoint first, so a single undo rewinds a whole `draw(3)` or
//! `untap_all()` rather than one card at a time.

use crate::core::CardId;
use crate::table::details::GameDetails;
use crate::zones::{Zone, ZoneCard};
use serde::{Deserialize, Serialize};

/// Atomic table actions that can be logged and undone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableAction {
    /// A card left `from` at `from_index` and was inserted into `to`
    MoveCard {
        card_id: CardId,
        from: Zone,
        from_index: usize,
        to: Zone,
        before: ZoneCard,
    },

    /// A record was replaced in place (tap, transform, counters, reposition)
    UpdateCard {
        zone: Zone,
        index: usize,
        before: ZoneCard,
    },

    /// A zone was reordered; holds the previous contents
    Reorder { zone: Zone, before: Vec<ZoneCard> },

    /// The turn counter advanced
    ChangeTurn { from_turn: u32, to_turn: u32 },

    /// Life or mana changed; holds the previous values
    UpdateDetails { before: GameDetails },
}

/// Stack of table actions with checkpoints at user-level operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoLog {
    /// Stack of actions (most recent at end)
    actions: Vec<TableAction>,

    /// Log lengths at which a user-level operation started
    checkpoints: Vec<usize>,
}

impl UndoLog {
    pub fn new() -> Self {
        UndoLog {
            actions: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    /// Log an action
    pub fn log(&mut self, action: TableAction) {
        self.actions.push(action);
    }

    /// Mark the start of a user-level operation
    ///
    /// Consecutive checkpoints with nothing logged in between collapse into one.
    pub fn mark_checkpoint(&mut self) {
        if self.checkpoints.last() != Some(&self.actions.len()) {
            self.checkpoints.push(self.actions.len());
        }
    }

    /// Remove every action since the most recent non-empty checkpoint
    ///
    /// Actions come back most recent first, the order they must be inverted in.
    pub fn pop_operation(&mut self) -> Vec<TableAction> {
        while let Some(&checkpoint) = self.checkpoints.last() {
            if checkpoint < self.actions.len() {
                break;
            }
            self.checkpoints.pop();
        }
        let start = self.checkpoints.pop().unwrap_or(0);
        let mut popped = self.actions.split_off(start);
        popped.reverse();
        popped
    }

    /// Get number of actions in log
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Clear the entire log
    pub fn clear(&mut self) {
        self.actions.clear();
        self.checkpoints.clear();
    }

    /// Get all actions (for debugging/serialization)
    pub fn actions(&self) -> &[TableAction] {
        &self.actions
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: u32) -> TableAction {
        TableAction::ChangeTurn {
            from_turn: n,
            to_turn: n + 1,
        }
    }

    #[test]
    fn test_undo_log() {
        let mut log = UndoLog::new();
        assert!(log.is_empty());

        log.mark_checkpoint();
        log.log(turn(1));
        assert_eq!(log.len(), 1);
        assert_eq!(log.actions(), &[turn(1)]);

        log.clear();
        assert!(log.is_empty());
        assert!(log.pop_operation().is_empty());
    }

    #[test]
    fn test_pop_operation_respects_checkpoints() {
        let mut log = UndoLog::new();

        log.mark_checkpoint();
        log.log(turn(1));
        log.mark_checkpoint();
        log.log(turn(2));
        log.log(turn(3));
        // Empty operation: nothing logged after this checkpoint
        log.mark_checkpoint();

        let popped = log.pop_operation();
        assert_eq!(popped, vec![turn(3), turn(2)]);
        assert_eq!(log.len(), 1);

        assert_eq!(log.pop_operation(), vec![turn(1)]);
        assert!(log.pop_operation().is_empty());
    }
}
