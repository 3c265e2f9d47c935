//! Opening hand setup
//!
//! A normal deal draws the top cards of the shuffled library. For practicing
//! a specific opening, a [`HandSetup`] names cards to pull out of the library
//! first; the rest of the hand is then drawn as usual.

use crate::core::Card;
use crate::table::state::TableState;
use crate::zones::Zone;
use crate::{GoldfishError, Result};
use rustc_hash::FxHashMap;

/// Cards to place in the opening hand (by card name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSetup {
    pub specific_cards: Vec<String>,
}

impl HandSetup {
    /// Parse hand setup from semicolon-separated card names
    pub fn parse(input: &str) -> Result<Self> {
        let cards: Vec<String> = input
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if cards.is_empty() {
            return Err(GoldfishError::InvalidHandSetup(
                "Hand setup must contain at least one card".to_string(),
            ));
        }

        Ok(HandSetup {
            specific_cards: cards,
        })
    }

    /// Check the setup can be satisfied from `mainboard` with a hand of
    /// `hand_size` cards
    ///
    /// Names must match exactly and a name listed twice needs two copies.
    pub fn validate(&self, mainboard: &[Card], hand_size: usize) -> Result<()> {
        if self.specific_cards.len() > hand_size {
            return Err(GoldfishError::InvalidHandSetup(format!(
                "Hand setup cannot contain more than {} cards (got {})",
                hand_size,
                self.specific_cards.len()
            )));
        }

        let mut available: FxHashMap<&str, usize> = FxHashMap::default();
        for card in mainboard {
            *available.entry(card.name.as_str()).or_default() += 1;
        }

        for name in &self.specific_cards {
            match available.get_mut(name.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    return Err(GoldfishError::InvalidHandSetup(format!(
                        "Card '{name}' not found in the library"
                    )))
                }
            }
        }

        Ok(())
    }
}

/// Deal the opening hand from the (already shuffled) library
pub fn deal_opening_hand(state: &mut TableState, setup: Option<&HandSetup>) -> Result<()> {
    let mut placed = 0;

    if let Some(setup) = setup {
        for name in &setup.specific_cards {
            let card_id = state
                .zone(Zone::Library)
                .iter()
                .rev()
                .find(|zc| zc.name() == name.as_str())
                .map(|zc| zc.id())
                .ok_or_else(|| {
                    GoldfishError::InvalidHandSetup(format!(
                        "Card '{name}' not found in the library"
                    ))
                })?;
            let Some(record) = state.zones.get(Zone::Library, card_id).cloned() else {
                continue;
            };
            state.relocate(Zone::Library, card_id, Zone::Hand, None, record);
            placed += 1;
        }
    }

    let remaining = state.config.starting_hand_size.saturating_sub(placed);
    state.draw_cards(remaining);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::loader::DeckInfo;
    use crate::table::config::TableConfig;

    fn mainboard() -> Vec<Card> {
        let names = ["Forest", "Forest", "Forest", "Llanowar Elves", "Giant Growth"];
        (0..20)
            .map(|i| Card::new(CardId::new(i), names[i as usize % names.len()]))
            .collect()
    }

    #[test]
    fn test_parse_hand_setup() {
        let setup = HandSetup::parse(" Forest ; Llanowar Elves ;").unwrap();
        assert_eq!(setup.specific_cards, vec!["Forest", "Llanowar Elves"]);

        assert!(HandSetup::parse("").is_err());
        assert!(HandSetup::parse(" ; ").is_err());
    }

    #[test]
    fn test_validate_counts_copies() {
        let cards = mainboard();
        assert!(HandSetup::parse("Giant Growth;Giant Growth")
            .unwrap()
            .validate(&cards, 7)
            .is_ok());
        assert!(HandSetup::parse("Giant Growth;Giant Growth;Giant Growth;Giant Growth;Giant Growth")
            .unwrap()
            .validate(&cards, 7)
            .is_err());
        assert!(HandSetup::parse("Island").unwrap().validate(&cards, 7).is_err());
        assert!(HandSetup::parse("A;B;C")
            .unwrap()
            .validate(&cards, 2)
            .is_err());
    }

    #[test]
    fn test_controlled_opening_hand() {
        let mut state = TableState::new(TableConfig::with_seed(7));
        let setup = HandSetup::parse("Llanowar Elves;Giant Growth").unwrap();
        let deck = DeckInfo {
            mainboard: mainboard(),
            commanders: Vec::new(),
        };
        state.start_game(Some(deck), Some(&setup)).unwrap();

        let hand = state.zone(Zone::Hand);
        assert_eq!(hand.len(), 7);
        assert_eq!(hand[0].name(), "Llanowar Elves");
        assert_eq!(hand[1].name(), "Giant Growth");
        assert_eq!(state.zones.len(Zone::Library), 13);
    }

    #[test]
    fn test_invalid_setup_leaves_table_untouched() {
        let mut state = TableState::new(TableConfig::with_seed(7));
        let deck = DeckInfo {
            mainboard: mainboard(),
            commanders: Vec::new(),
        };
        state.start_game(Some(deck.clone()), None).unwrap();
        let before = state.zones.clone();

        let setup = HandSetup::parse("Black Lotus").unwrap();
        assert!(state.start_game(Some(deck), Some(&setup)).is_err());
        assert_eq!(state.zones, before);
    }
}
