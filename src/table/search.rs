//! Zone search dialog
//!
//! A search snapshots one zone when it opens. Copies of the same card are
//! grouped into one row, the query narrows the rows as it is typed, and
//! committing a row hands back that card's record. Moving the card and
//! reshuffling afterwards is up to the caller.

use crate::zones::{Zone, ZoneCard, ZoneStore};
use crate::{GoldfishError, Result};
use deunicode::deunicode;

/// One row of the search list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOption {
    pub label: String,
    /// First copy of the card found in the zone
    pub record: ZoneCard,
    pub count: usize,
}

/// Front and (for double-faced cards) back face of the highlighted row
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPreview {
    pub front: ZoneCard,
    pub back: Option<ZoneCard>,
}

/// How a search ended
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClose {
    pub source: Zone,
    /// `None` when cancelled
    pub selected: Option<ZoneCard>,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    source: Zone,
    options: Vec<SearchOption>,
    query: String,
    selected_index: usize,
}

pub fn is_searchable(zone: Zone) -> bool {
    matches!(
        zone,
        Zone::Library | Zone::Hand | Zone::Graveyard | Zone::Exile
    )
}

/// Lowercased ASCII form used for matching ("Lim-Dûl" -> "lim-dul")
fn fold(s: &str) -> String {
    deunicode(s).to_lowercase()
}

/// Group a zone's cards by name into search rows
///
/// Rows come out most recently first-seen name first; the library, whose
/// order is secret, is listed alphabetically instead.
pub fn search_options(zone: Zone, cards: &[ZoneCard]) -> Vec<SearchOption> {
    let mut options: Vec<SearchOption> = Vec::new();
    for record in cards {
        match options.iter_mut().find(|o| o.label == record.name()) {
            Some(option) => option.count += 1,
            None => options.push(SearchOption {
                label: record.name().to_string(),
                record: record.clone(),
                count: 1,
            }),
        }
    }

    if zone == Zone::Library {
        options.sort_by(|a, b| a.label.cmp(&b.label));
    } else {
        options.reverse();
    }
    options
}

impl SearchSession {
    pub fn open(zone: Zone, zones: &ZoneStore) -> Result<Self> {
        if !is_searchable(zone) {
            return Err(GoldfishError::UnsearchableZone(zone));
        }
        Ok(SearchSession {
            source: zone,
            options: search_options(zone, zones.zone(zone)),
            query: String::new(),
            selected_index: 0,
        })
    }

    pub fn source(&self) -> Zone {
        self.source
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Every row, ignoring the query
    pub fn options(&self) -> &[SearchOption] {
        &self.options
    }

    /// Rows matching the current query, in display order
    pub fn filtered(&self) -> Vec<&SearchOption> {
        let needle = fold(&self.query);
        self.options
            .iter()
            .filter(|o| fold(&o.label).contains(&needle))
            .collect()
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.clamp_selection();
    }

    pub fn type_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selection();
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.clamp_selection();
    }

    pub fn up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn down(&mut self) {
        let last = self.filtered().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(last);
    }

    /// Commit the highlighted row; nothing happens when no row matches
    pub fn enter(&mut self) -> Option<SearchClose> {
        self.select_row(self.selected_index)
    }

    /// Commit a row of the filtered list directly
    pub fn select_row(&mut self, row: usize) -> Option<SearchClose> {
        let record = self.filtered().get(row)?.record.clone();
        Some(self.close(Some(record)))
    }

    pub fn cancel(&mut self) -> SearchClose {
        self.close(None)
    }

    /// Both faces of the highlighted card, whatever its current state
    pub fn preview(&self) -> Option<SearchPreview> {
        let filtered = self.filtered();
        let record = &filtered.get(self.selected_index)?.record;
        Some(SearchPreview {
            front: record.with_transformed(false),
            back: record
                .card
                .is_double_faced()
                .then(|| record.with_transformed(true)),
        })
    }

    fn clamp_selection(&mut self) {
        let last = self.filtered().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(last);
    }

    fn close(&mut self, selected: Option<ZoneCard>) -> SearchClose {
        self.query.clear();
        self.selected_index = 0;
        SearchClose {
            source: self.source,
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardId};
    use std::sync::Arc;

    fn zone_of(names: &[&str]) -> Vec<ZoneCard> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ZoneCard::new(Arc::new(Card::new(CardId::new(i as u32), *name))))
            .collect()
    }

    fn labels(options: &[&SearchOption]) -> Vec<(String, usize)> {
        options.iter().map(|o| (o.label.clone(), o.count)).collect()
    }

    fn session(zone: Zone, names: &[&str]) -> SearchSession {
        let mut zones = ZoneStore::new();
        zones.set_zone(zone, zone_of(names));
        SearchSession::open(zone, &zones).unwrap()
    }

    #[test]
    fn test_library_sorted() {
        let s = session(Zone::Library, &["C", "A", "B", "A"]);
        let rows: Vec<&SearchOption> = s.options().iter().collect();
        assert_eq!(
            labels(&rows),
            vec![("A".into(), 2), ("B".into(), 1), ("C".into(), 1)]
        );
        // Representative is the first copy
        assert_eq!(rows[0].record.id(), CardId::new(1));
    }

    #[test]
    fn test_other_zones_reverse_first_seen() {
        let s = session(Zone::Hand, &["C", "A", "A"]);
        let rows: Vec<&SearchOption> = s.options().iter().collect();
        assert_eq!(labels(&rows), vec![("A".into(), 2), ("C".into(), 1)]);
    }

    #[test]
    fn test_unsearchable_zones() {
        let zones = ZoneStore::new();
        assert!(SearchSession::open(Zone::Battlefield, &zones).is_err());
        assert!(SearchSession::open(Zone::Command, &zones).is_err());
    }

    #[test]
    fn test_filter_folds_case_and_accents() {
        let mut s = session(
            Zone::Graveyard,
            &["Lim-Dûl's Vault", "Island", "Llanowar Elves"],
        );
        s.set_query("DUL");
        assert_eq!(labels(&s.filtered()), vec![("Lim-Dûl's Vault".into(), 1)]);

        s.set_query("l");
        assert_eq!(s.filtered().len(), 3);
        s.set_query("an");
        assert_eq!(
            labels(&s.filtered()),
            vec![("Llanowar Elves".into(), 1), ("Island".into(), 1)]
        );
    }

    #[test]
    fn test_navigation_clamps() {
        let mut s = session(Zone::Exile, &["A", "B", "C"]);
        s.up();
        assert_eq!(s.selected_index(), 0);
        s.down();
        s.down();
        s.down();
        assert_eq!(s.selected_index(), 2);

        // Shrinking the list pulls the selection back in range
        s.type_char('a');
        assert_eq!(s.selected_index(), 0);
        s.backspace();
        assert_eq!(s.query(), "");
    }

    #[test]
    fn test_enter_with_no_rows_is_noop() {
        let mut s = session(Zone::Library, &["Forest"]);
        s.set_query("zzz");
        assert!(s.enter().is_none());
        assert_eq!(s.query(), "zzz");

        s.set_query("for");
        let close = s.enter().unwrap();
        assert_eq!(close.source, Zone::Library);
        assert_eq!(close.selected.unwrap().name(), "Forest");
        assert_eq!(s.query(), "");
        assert_eq!(s.selected_index(), 0);
    }

    #[test]
    fn test_preview_shows_both_faces() {
        let mut s = session(Zone::Hand, &["Delver of Secrets // Insectile Aberration"]);
        let preview = s.preview().unwrap();
        assert!(!preview.front.transformed);
        assert!(preview.back.unwrap().transformed);

        s = session(Zone::Hand, &["Forest"]);
        assert!(s.preview().unwrap().back.is_none());
        assert!(s.cancel().selected.is_none());
    }
}
