//! Drag-and-drop gesture tracking
//!
//! One gesture at a time: the first move of a gesture records the card, its
//! source zone and where on the card it was grabbed; later moves only update
//! the hovered zone, and the drop performs the transfer. Whatever happens on drop, the coordinator returns
//! to [`DragState::Idle`].

use crate::core::{CardId, Point};
use crate::table::layout::HitTest;
use crate::table::state::TableState;
use crate::table::transitions::TransferOutcome;
use crate::zones::{Zone, ZoneStore};
use crate::GoldfishError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        card: CardId,
        source: Zone,
        hovered: Option<Zone>,
        pointer: Point,
        /// Pointer position relative to the card's top-left corner
        grab_offset: Point,
    },
}

/// What happened when a gesture ended
#[derive(Debug)]
pub enum DropResult {
    /// No gesture was in progress
    NotDragging,
    /// Released outside every zone
    NoTarget { card: CardId, source: Zone },
    Transferred {
        card: CardId,
        source: Zone,
        target: Zone,
        outcome: TransferOutcome,
    },
    Failed(GoldfishError),
}

impl DropResult {
    /// Whether the dragged element must be put back at a neutral offset
    ///
    /// Moved cards are re-rendered in their new zone and repositioned cards
    /// already sit where they were dropped.
    pub fn snap_back(&self) -> bool {
        match self {
            DropResult::NotDragging => false,
            DropResult::NoTarget { .. } | DropResult::Failed(_) => true,
            DropResult::Transferred { outcome, .. } => outcome.snap_back(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a gesture for `card` picked up from `source`
    ///
    /// `grab_offset` is where the pointer sits on the card. Ignored while a
    /// gesture is already in progress.
    pub fn begin(&mut self, card: CardId, source: Zone, pointer: Point, grab_offset: Point) {
        if self.is_dragging() {
            return;
        }
        self.state = DragState::Dragging {
            card,
            source,
            hovered: Some(source),
            pointer,
            grab_offset,
        };
    }

    /// Follow the pointer, recomputing which zone it is over
    pub fn drag_move(&mut self, pointer: Point, layout: &impl HitTest) {
        if let DragState::Dragging {
            hovered,
            pointer: last,
            ..
        } = &mut self.state
        {
            *hovered = layout.zone_at(pointer);
            *last = pointer;
        }
    }

    pub fn abort(&mut self) {
        self.state = DragState::Idle;
    }

    /// End the gesture, transferring the card to the hovered zone
    ///
    /// The drop point handed to the table is the card's top-left corner
    /// relative to the target zone's container, so a card released where it
    /// was grabbed stays put.
    pub fn drop(&mut self, table: &mut TableState, layout: &impl HitTest) -> DropResult {
        let DragState::Dragging {
            card,
            source,
            hovered,
            pointer,
            grab_offset,
        } = std::mem::take(&mut self.state)
        else {
            return DropResult::NotDragging;
        };

        let Some(target) = hovered else {
            return DropResult::NoTarget { card, source };
        };

        let local = pointer - grab_offset - layout.zone_origin(target);
        match table.transfer_zone(card, source, target, Some(local)) {
            Ok(outcome) => DropResult::Transferred {
                card,
                source,
                target,
                outcome,
            },
            Err(e) => DropResult::Failed(e),
        }
    }
}

/// Card under the pointer, for shortcuts that act on "the hovered card"
pub fn hovered_card(pointer: Point, layout: &impl HitTest, zones: &ZoneStore) -> Option<CardId> {
    layout.card_at(pointer, zones)
}
