//! Interactive session: table state plus pointer, drag and dialogs
//!
//! The session routes input. Key presses go to the open dialog if there is
//! one, otherwise to the shortcut dispatcher; pointer movement feeds the
//! drag coordinator and decides which card shortcuts act on.

use crate::core::{CardId, Point};
use crate::table::drag::{self, DragCoordinator, DropResult};
use crate::table::layout::{HitTest, ZoneLayout};
use crate::table::search::{SearchClose, SearchSession};
use crate::table::shortcuts::{self, Dispatch};
use crate::table::state::TableState;
use crate::zones::Zone;
use crate::Result;

/// A key press as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
}

/// Dialog currently covering the table
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    Search(SearchSession),
    RestartConfirm,
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

pub struct Session {
    table: TableState,
    drag: DragCoordinator,
    modal: Modal,
    pointer: Point,
    layout: ZoneLayout,
}

impl Session {
    pub fn new(table: TableState) -> Self {
        let layout = ZoneLayout::new(&table.config);
        Self::with_layout(table, layout)
    }

    pub fn with_layout(table: TableState, layout: ZoneLayout) -> Self {
        Session {
            table,
            drag: DragCoordinator::new(),
            modal: Modal::None,
            pointer: Point::ORIGIN,
            layout,
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Shortcuts only work with no gesture in progress and no dialog open
    pub fn shortcuts_enabled(&self) -> bool {
        !self.drag.is_dragging() && !self.modal.is_open()
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        self.pointer = pointer;
        self.drag.drag_move(pointer, &self.layout);
    }

    pub fn hovered_card(&self) -> Option<CardId> {
        drag::hovered_card(self.pointer, &self.layout, &self.table.zones)
    }

    /// Pick up `card` from wherever it is; false if it is not on the table
    pub fn begin_drag(&mut self, card: CardId) -> bool {
        if self.modal.is_open() {
            return false;
        }
        let Some((zone, _)) = self.table.card(card) else {
            return false;
        };
        let grab_offset = self
            .layout
            .card_origin(card, &self.table.zones)
            .map_or(Point::ORIGIN, |origin| self.pointer - origin);
        self.drag.begin(card, zone, self.pointer, grab_offset);
        true
    }

    /// Click a card; clicking the library pile draws a card
    ///
    /// Returns whether the click did anything. Clicks are ignored while a
    /// gesture or dialog is in progress.
    pub fn click_card(&mut self, card: CardId) -> bool {
        if !self.shortcuts_enabled() {
            return false;
        }
        match self.table.card(card) {
            Some((Zone::Library, _)) => self.table.draw(1) == 1,
            _ => false,
        }
    }

    pub fn drop_card(&mut self) -> DropResult {
        self.drag.drop(&mut self.table, &self.layout)
    }

    pub fn abort_drag(&mut self) {
        self.drag.abort();
    }

    /// Route a key press to the open dialog or the shortcut dispatcher
    pub fn key(&mut self, key: Key) -> Result<Dispatch> {
        match &mut self.modal {
            Modal::None => match key {
                Key::Char(c) => self.shortcut(c),
                _ => Ok(Dispatch::Ignored),
            },
            Modal::RestartConfirm => match key {
                Key::Enter | Key::Char('y') => {
                    self.confirm_restart(true)?;
                    Ok(Dispatch::Applied)
                }
                Key::Escape | Key::Char('n') => {
                    self.confirm_restart(false)?;
                    Ok(Dispatch::Applied)
                }
                _ => Ok(Dispatch::Ignored),
            },
            Modal::Search(search) => {
                let close = match key {
                    Key::Up => {
                        search.up();
                        None
                    }
                    Key::Down => {
                        search.down();
                        None
                    }
                    Key::Char(c) => {
                        search.type_char(c);
                        None
                    }
                    Key::Backspace => {
                        search.backspace();
                        None
                    }
                    Key::Enter => search.enter(),
                    Key::Escape => Some(search.cancel()),
                };
                if let Some(close) = close {
                    self.finish_search(close)?;
                }
                Ok(Dispatch::Applied)
            }
        }
    }

    /// Commit a row of the open search directly
    pub fn select_search_row(&mut self, row: usize) -> Result<bool> {
        let Modal::Search(search) = &mut self.modal else {
            return Ok(false);
        };
        match search.select_row(row) {
            Some(close) => {
                self.finish_search(close)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Answer the restart dialog; declining leaves the table untouched
    pub fn confirm_restart(&mut self, confirmed: bool) -> Result<()> {
        if !matches!(self.modal, Modal::RestartConfirm) {
            return Ok(());
        }
        self.modal = Modal::None;
        if confirmed {
            self.drag.abort();
            self.table.restart()?;
        }
        Ok(())
    }

    pub fn open_search(&mut self, zone: Zone) -> Result<()> {
        let search = SearchSession::open(zone, &self.table.zones)?;
        self.table
            .logger
            .normal(&format!("Searching {} ({} cards)", zone, self.table.zones.len(zone)));
        self.modal = Modal::Search(search);
        Ok(())
    }

    fn shortcut(&mut self, c: char) -> Result<Dispatch> {
        let hovered = self.hovered_card();
        let enabled = self.shortcuts_enabled();
        let dispatch = shortcuts::dispatch(c, &mut self.table, hovered, enabled);
        match dispatch {
            Dispatch::OpenSearch(zone) => self.open_search(zone)?,
            Dispatch::ConfirmRestart => self.modal = Modal::RestartConfirm,
            Dispatch::Applied | Dispatch::Ignored => {}
        }
        Ok(dispatch)
    }

    /// Close the search dialog, retrieving the chosen card into the hand
    ///
    /// Any library search ends with a reshuffle, even a cancelled one.
    fn finish_search(&mut self, close: SearchClose) -> Result<()> {
        self.modal = Modal::None;
        if let Some(record) = close.selected {
            self.table.retrieve(record.id(), close.source)?;
        }
        if close.source == Zone::Library {
            self.table.shuffle(Zone::Library);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Card;
    use crate::loader::DeckInfo;
    use crate::table::config::TableConfig;

    fn session() -> Session {
        let mainboard = (1..=30)
            .map(|i| Card::new(CardId::new(i), format!("Card {:02}", i % 10)))
            .collect();
        let mut table = TableState::new(TableConfig::with_seed(5));
        table
            .start_game(
                Some(DeckInfo {
                    mainboard,
                    commanders: Vec::new(),
                }),
                None,
            )
            .unwrap();
        Session::new(table)
    }

    #[test]
    fn test_library_search_commit() {
        let mut s = session();
        s.key(Key::Char('l')).unwrap();
        assert!(matches!(s.modal(), Modal::Search(_)));
        assert!(!s.shortcuts_enabled());

        // Keys now go to the dialog, not the dispatcher
        s.key(Key::Char('d')).unwrap();
        assert_eq!(s.table().zones.len(Zone::Hand), 7);
        s.key(Key::Backspace).unwrap();

        s.table_mut().zones.take_shuffle(Zone::Library);
        let library_before: Vec<CardId> =
            s.table().zone(Zone::Library).iter().map(|zc| zc.id()).collect();
        s.key(Key::Down).unwrap();
        s.key(Key::Enter).unwrap();

        assert!(!s.modal().is_open());
        assert_eq!(s.table().zones.len(Zone::Hand), 8);
        assert_eq!(s.table().zones.len(Zone::Library), 22);
        let picked = s.table().zone(Zone::Hand).last().unwrap().id();
        assert!(s.table().zones.get(Zone::Library, picked).is_none());
        assert!(s.table_mut().zones.take_shuffle(Zone::Library));

        // The rest of the library was actually reordered
        let untouched: Vec<CardId> = library_before.into_iter().filter(|&id| id != picked).collect();
        let library_after: Vec<CardId> =
            s.table().zone(Zone::Library).iter().map(|zc| zc.id()).collect();
        assert_ne!(library_after, untouched);
    }

    #[test]
    fn test_cancelled_library_search_reshuffles() {
        let mut s = session();
        s.open_search(Zone::Library).unwrap();
        s.table_mut().zones.take_shuffle(Zone::Library);
        s.key(Key::Escape).unwrap();
        assert!(!s.modal().is_open());
        assert_eq!(s.table().zones.len(Zone::Hand), 7);
        assert!(s.table_mut().zones.take_shuffle(Zone::Library));
    }

    #[test]
    fn test_restart_is_two_step() {
        let mut s = session();
        s.key(Key::Char('d')).unwrap();
        s.key(Key::Char('r')).unwrap();
        assert!(matches!(s.modal(), Modal::RestartConfirm));

        s.key(Key::Escape).unwrap();
        assert_eq!(s.table().zones.len(Zone::Hand), 8);

        s.key(Key::Char('r')).unwrap();
        s.confirm_restart(true).unwrap();
        assert_eq!(s.table().zones.len(Zone::Hand), 7);
        assert!(!s.modal().is_open());
    }

    #[test]
    fn test_drag_disables_shortcuts() {
        let mut s = session();
        s.pointer_move(Point::new(400.0, 700.0));
        let card = s.hovered_card().unwrap();
        assert!(s.begin_drag(card));

        assert_eq!(s.key(Key::Char('d')).unwrap(), Dispatch::Ignored);
        s.pointer_move(Point::new(100.0, 200.0));
        assert!(!s.drop_card().snap_back());
        assert!(s.shortcuts_enabled());
        assert_eq!(s.table().card(card).unwrap().0, Zone::Battlefield);
    }

    #[test]
    fn test_click_library_draws() {
        let mut s = session();
        let library_card = s.table().zone(Zone::Library)[0].id();
        let top = s.table().zone(Zone::Library).last().unwrap().id();

        assert!(s.click_card(library_card));
        assert_eq!(s.table().zones.len(Zone::Hand), 8);
        assert_eq!(s.table().zone(Zone::Hand).last().unwrap().id(), top);

        // Other zones do nothing
        let hand_card = s.table().zone(Zone::Hand)[0].id();
        assert!(!s.click_card(hand_card));

        // Nor does clicking behind a dialog
        s.open_search(Zone::Graveyard).unwrap();
        assert!(!s.click_card(library_card));
        assert_eq!(s.table().zones.len(Zone::Hand), 8);
    }
}
