//! Deck file tests
//!
//! One test is generated per `.dck` file in `test_decks/`: the deck must
//! parse, deal a legal opening table, survive a store round trip, and play
//! out identically for the same seed.

use dir_test::{dir_test, Fixture};
use goldfish::core::CardId;
use goldfish::loader::{DeckInfo, DeckLoader, DeckStore, JsonDeckStore, MemoryDeckStore};
use goldfish::table::{OutputMode, TableConfig, TableState};
use goldfish::zones::Zone;
use similar_asserts::assert_eq;

fn deal(deck: DeckInfo, seed: u64) -> TableState {
    let mut table = TableState::new(TableConfig::with_seed(seed));
    table.logger.set_output_mode(OutputMode::Memory);
    table.logger.set_verbosity(goldfish::table::VerbosityLevel::Verbose);
    table.start_game(Some(deck), None).unwrap();
    table
}

/// A fixed run of table operations, returning the captured log
fn play_script(deck: DeckInfo, seed: u64) -> Vec<String> {
    let mut table = deal(deck, seed);
    for turn in 0..4 {
        table.next_turn();
        let hand: Vec<CardId> = table.zone(Zone::Hand).iter().map(|zc| zc.id()).collect();
        if let Some(&card) = hand.get(turn) {
            table
                .transfer_zone(card, Zone::Hand, Zone::Battlefield, None)
                .unwrap();
            table.toggle_tap(card);
        }
        table.shuffle(Zone::Library);
    }
    let messages = table.logger.logs().iter().map(|entry| entry.message.clone()).collect();
    messages
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_decks",
    glob: "**/*.dck",
)]
fn test_deck_file(fixture: Fixture<&str>) {
    let list = DeckLoader::parse(fixture.content()).unwrap();
    let deck = list.build();
    assert_eq!(deck.mainboard.len(), list.total_cards());
    assert_eq!(deck.commanders.len(), list.commander_count());

    // Opening table
    let table = deal(deck.clone(), 42);
    let hand = deck.mainboard.len().min(7);
    assert_eq!(table.zones.len(Zone::Hand), hand);
    assert_eq!(table.zones.len(Zone::Library), deck.mainboard.len() - hand);
    assert_eq!(table.zones.len(Zone::Command), deck.commanders.len());
    assert_eq!(table.zones.total_cards(), deck.len());

    // Stores hand back the same deck
    let memory = MemoryDeckStore::new();
    memory.put_deck(&deck.all_cards(), "deck").unwrap();
    assert_eq!(memory.get_deck().unwrap(), Some(deck.clone()));

    let dir = std::env::temp_dir().join(format!(
        "goldfish-deck-{}-{}",
        std::process::id(),
        fixture.path().replace(['/', '\\', '.'], "_")
    ));
    let store = JsonDeckStore::open(&dir).unwrap();
    store.put_deck(&deck.all_cards(), "deck").unwrap();
    assert_eq!(store.get_deck().unwrap(), Some(deck.clone()));
    std::fs::remove_dir_all(&dir).unwrap();

    // Same seed, same game
    let run1 = play_script(deck.clone(), 7);
    let run2 = play_script(deck, 7);
    assert!(!run1.is_empty());
    assert_eq!(run1, run2);
}
