//! Deck file loader
//!
//! Decks are plain text:
//!
//! ```text
//! # comment
//! [Commander]
//! 1 Omnath, Locus of Mana|WWK
//!
//! [Main]
//! 30 Forest
//! 4 Llanowar Elves|M19 *F*
//!
//! [Sideboard]
//! 2 Naturalize
//! ```
//!
//! Lines outside any section belong to the main deck. `|SET` picks the
//! printing used for images and a trailing `*F*` marks the copies as foil.

use crate::core::{Card, CardIdAllocator};
use crate::{GoldfishError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const FOIL_MARKER: &str = "*F*";

/// Deck loader for deck list files
pub struct DeckLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Main,
    Commander,
    Sideboard,
    /// Metadata and other bracketed sections we don't read
    Other,
}

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut deck = DeckList::default();
        let mut section = Section::Main;

        for (line_no, raw) in content.lines().enumerate() {
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = match header.trim().to_lowercase().as_str() {
                    "main" | "mainboard" => Section::Main,
                    "commander" | "commanders" => Section::Commander,
                    "sideboard" => Section::Sideboard,
                    _ => Section::Other,
                };
                continue;
            }

            let target = match section {
                Section::Main => &mut deck.main_deck,
                Section::Commander => &mut deck.commanders,
                Section::Sideboard => &mut deck.sideboard,
                Section::Other => continue,
            };

            let entry = Self::parse_entry(line).ok_or_else(|| {
                GoldfishError::InvalidDeckFormat(format!(
                    "line {}: expected '<count> <card name>[|SET] [*F*]', got '{}'",
                    line_no + 1,
                    line
                ))
            })?;

            target.push(entry);
        }

        if deck.main_deck.is_empty() && deck.commanders.is_empty() {
            return Err(GoldfishError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(deck)
    }

    // Format: "1 Card Name" or "1 Card Name|SET" with an optional foil marker
    fn parse_entry(line: &str) -> Option<DeckEntry> {
        let (count_str, rest) = line.split_once(' ')?;
        let count = count_str.trim_end_matches('x').parse::<u8>().ok()?;

        let (rest, foil) = match rest.trim_end().strip_suffix(FOIL_MARKER) {
            Some(stripped) => (stripped.trim_end(), true),
            None => (rest.trim_end(), false),
        };

        let (card_name, set) = match rest.split_once('|') {
            Some((name, set)) => (name.trim(), Some(set.trim().to_string())),
            None => (rest.trim(), None),
        };

        if card_name.is_empty() || count == 0 {
            return None;
        }

        Some(DeckEntry {
            card_name: card_name.to_string(),
            set: set.filter(|s| !s.is_empty()),
            count,
            foil,
        })
    }
}

/// Represents a deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub set: Option<String>,
    pub count: u8,
    pub foil: bool,
}

/// Represents a complete deck list
#[derive(Debug, Clone, Default)]
pub struct DeckList {
    pub main_deck: Vec<DeckEntry>,
    pub commanders: Vec<DeckEntry>,
    pub sideboard: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    pub fn commander_count(&self) -> usize {
        self.commanders.iter().map(|e| e.count as usize).sum()
    }

    /// Expand the list into individual cards with fresh IDs
    ///
    /// Commanders are numbered first, then the main deck in file order.
    /// The sideboard is not part of play.
    pub fn build(&self) -> DeckInfo {
        let mut ids = CardIdAllocator::new();
        let mut expand = |entries: &[DeckEntry], commander: bool| -> Vec<Card> {
            entries
                .iter()
                .flat_map(|entry| std::iter::repeat(entry).take(entry.count as usize))
                .map(|entry| Card {
                    id: ids.next_id(),
                    name: entry.card_name.clone(),
                    set: entry.set.clone().unwrap_or_default(),
                    commander,
                    foil: entry.foil,
                })
                .collect()
        };

        let commanders = expand(&self.commanders, true);
        let mainboard = expand(&self.main_deck, false);
        DeckInfo {
            mainboard,
            commanders,
        }
    }
}

/// The cards a table is dealt from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    pub mainboard: Vec<Card>,
    pub commanders: Vec<Card>,
}

impl DeckInfo {
    /// Split a flat card list on the commander flag
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let (commanders, mainboard) = cards.into_iter().partition(|c| c.commander);
        DeckInfo {
            mainboard,
            commanders,
        }
    }

    /// Commanders followed by the main deck
    pub fn all_cards(&self) -> Vec<Card> {
        self.commanders
            .iter()
            .chain(self.mainboard.iter())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mainboard.len() + self.commanders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
