//! Single-key table commands

use crate::core::CardId;
use crate::table::state::TableState;
use crate::zones::Zone;

/// A bound table command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Draw,
    ShuffleLibrary,
    UntapAll,
    Transform,
    NextTurn,
    Restart,
    LibraryBottom,
    Search(Zone),
    AddCounter,
    RemoveCounter,
    ClearCounters,
    ToggleTap,
}

impl Shortcut {
    pub fn from_key(key: char) -> Option<Shortcut> {
        let shortcut = match key {
            'd' => Shortcut::Draw,
            's' => Shortcut::ShuffleLibrary,
            'u' => Shortcut::UntapAll,
            't' => Shortcut::Transform,
            'n' => Shortcut::NextTurn,
            'r' => Shortcut::Restart,
            'b' => Shortcut::LibraryBottom,
            'e' => Shortcut::Search(Zone::Exile),
            'g' => Shortcut::Search(Zone::Graveyard),
            'h' => Shortcut::Search(Zone::Hand),
            'l' => Shortcut::Search(Zone::Library),
            '=' => Shortcut::AddCounter,
            '-' => Shortcut::RemoveCounter,
            '0' => Shortcut::ClearCounters,
            'x' => Shortcut::ToggleTap,
            _ => return None,
        };
        Some(shortcut)
    }
}

/// Result of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Unbound key, dispatch disabled, or no hovered card to act on
    Ignored,
    /// The table was updated
    Applied,
    /// The caller should open a search over this zone
    OpenSearch(Zone),
    /// The caller should ask for restart confirmation
    ConfirmRestart,
}

/// Run the command bound to `key`
///
/// `enabled` is false while a drag is in progress or a dialog is open.
pub fn dispatch(
    key: char,
    table: &mut TableState,
    hovered: Option<CardId>,
    enabled: bool,
) -> Dispatch {
    if !enabled {
        return Dispatch::Ignored;
    }
    let Some(shortcut) = Shortcut::from_key(key) else {
        return Dispatch::Ignored;
    };

    match shortcut {
        Shortcut::Draw => {
            table.draw(1);
        }
        Shortcut::ShuffleLibrary => table.shuffle(Zone::Library),
        Shortcut::UntapAll => table.untap_all(),
        Shortcut::NextTurn => table.next_turn(),
        Shortcut::Restart => return Dispatch::ConfirmRestart,
        Shortcut::Search(zone) => return Dispatch::OpenSearch(zone),
        _ => {
            let Some(card) = hovered else {
                return Dispatch::Ignored;
            };
            apply_to_card(shortcut, table, card);
        }
    }
    Dispatch::Applied
}

fn apply_to_card(shortcut: Shortcut, table: &mut TableState, card: CardId) {
    match shortcut {
        Shortcut::Transform => {
            table.toggle_transform(card);
        }
        Shortcut::LibraryBottom => {
            table.put_on_library_bottom(card);
        }
        Shortcut::AddCounter => {
            table.set_counters(card, 1, true);
        }
        Shortcut::RemoveCounter => {
            table.set_counters(card, -1, true);
        }
        Shortcut::ClearCounters => {
            table.set_counters(card, 0, false);
        }
        Shortcut::ToggleTap => {
            table.toggle_tap(card);
        }
        _ => {}
    }
}
