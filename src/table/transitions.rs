//! Zone transition rules
//!
//! Pure functions deciding what happens to a record when it crosses (or
//! stays inside) a zone boundary. [`TableState`](crate::table::TableState)
//! applies the results to the zone store.

use crate::core::{Card, Point};
use crate::zones::{Zone, ZoneCard};

/// What a drag-and-drop transfer did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The card changed zones
    Moved,
    /// The card was dropped back onto the battlefield at a new position
    Repositioned,
    /// Dropped on its own slot-based zone; nothing changed
    Unchanged,
    /// The target zone refused the card; nothing changed
    Rejected,
}

impl TransferOutcome {
    /// Did the card end up in a different zone?
    pub fn changed_zone(self) -> bool {
        self == TransferOutcome::Moved
    }

    /// Should the dragged element be forced back to a neutral offset?
    ///
    /// Moved cards are laid out by their new zone and repositioned cards sit
    /// at their recorded position, so only the no-change outcomes snap back.
    pub fn snap_back(self) -> bool {
        matches!(self, TransferOutcome::Unchanged | TransferOutcome::Rejected)
    }
}

/// The record change a transfer calls for
#[derive(Debug, Clone, PartialEq)]
pub enum TransferPlan {
    Reject,
    Keep,
    /// Replace the record in place
    Reposition(ZoneCard),
    /// Remove from the source and append this record to the target
    Move(ZoneCard),
}

impl TransferPlan {
    pub fn outcome(&self) -> TransferOutcome {
        match self {
            TransferPlan::Reject => TransferOutcome::Rejected,
            TransferPlan::Keep => TransferOutcome::Unchanged,
            TransferPlan::Reposition(_) => TransferOutcome::Repositioned,
            TransferPlan::Move(_) => TransferOutcome::Moved,
        }
    }
}

/// Only commanders may enter the command zone
pub fn can_enter(card: &Card, zone: Zone) -> bool {
    zone != Zone::Command || card.commander
}

/// Tapping only means something on the battlefield
pub fn can_tap(zone: Zone) -> bool {
    zone == Zone::Battlefield
}

/// The library is a face-down pile, so there is no face to flip there
pub fn can_transform(zone: Zone) -> bool {
    zone != Zone::Library
}

pub fn can_hold_counters(zone: Zone) -> bool {
    zone == Zone::Battlefield
}

/// New counter value for a relative adjustment or an absolute set
pub fn next_counters(current: i32, amount: i32, relative: bool) -> i32 {
    if relative {
        current.saturating_add(amount)
    } else {
        amount
    }
}

/// Where a card dropped at `drop_point` (battlefield-local) ends up
pub fn battlefield_position(drop_point: Option<Point>, zone_border_px: f32) -> Point {
    drop_point
        .map(|p| p.inset(zone_border_px))
        .unwrap_or(Point::ORIGIN)
}

/// Record for a card placed on the battlefield above every card there
pub fn place_on_battlefield(
    record: &ZoneCard,
    drop_point: Option<Point>,
    battlefield_max_stack_order: u32,
    zone_border_px: f32,
) -> ZoneCard {
    record.placed_at(
        battlefield_position(drop_point, zone_border_px),
        battlefield_max_stack_order + 1,
    )
}

/// Record for a card arriving in `target` from another zone
pub fn enter_zone(
    record: &ZoneCard,
    target: Zone,
    drop_point: Option<Point>,
    battlefield_max_stack_order: u32,
    zone_border_px: f32,
) -> ZoneCard {
    if target == Zone::Battlefield {
        place_on_battlefield(record, drop_point, battlefield_max_stack_order, zone_border_px)
    } else {
        record.left_battlefield()
    }
}

/// Decide how a drag from `source` to `target` changes `record`
pub fn plan_transfer(
    record: &ZoneCard,
    source: Zone,
    target: Zone,
    drop_point: Option<Point>,
    battlefield_max_stack_order: u32,
    zone_border_px: f32,
) -> TransferPlan {
    if source == target {
        return match (target, drop_point) {
            (Zone::Battlefield, Some(_)) => TransferPlan::Reposition(place_on_battlefield(
                record,
                drop_point,
                battlefield_max_stack_order,
                zone_border_px,
            )),
            _ => TransferPlan::Keep,
        };
    }

    if !can_enter(&record.card, target) {
        return TransferPlan::Reject;
    }

    TransferPlan::Move(enter_zone(
        record,
        target,
        drop_point,
        battlefield_max_stack_order,
        zone_border_px,
    ))
}
