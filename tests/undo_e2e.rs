//! End-to-end tests for the undo log
//!
//! Play a scripted session, rewind part of it and replay, then rewind to the
//! opening deal.

use goldfish::core::{CardId, Point};
use goldfish::loader::DeckLoader;
use goldfish::table::{TableConfig, TableState};
use goldfish::undo::TableAction;
use goldfish::zones::{Zone, ZoneCard};
use similar_asserts::assert_eq;
use std::path::Path;

fn dealt() -> TableState {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_decks/commander_elves.dck");
    let deck = DeckLoader::load_from_file(&path).unwrap().build();
    let mut table = TableState::new(TableConfig::with_seed(42424));
    table.logger.enable_capture();
    table.start_game(Some(deck), None).unwrap();
    table
}

fn snapshot(table: &TableState) -> Vec<Vec<ZoneCard>> {
    Zone::ALL.iter().map(|&z| table.zone(z).to_vec()).collect()
}

/// One scripted turn: play the first hand card, tap it, add a counter
fn play_turn(table: &mut TableState, turn: usize) {
    table.next_turn();
    let card = table.zone(Zone::Hand)[0].id();
    table
        .transfer_zone(
            card,
            Zone::Hand,
            Zone::Battlefield,
            Some(Point::new(60.0 * turn as f32, 40.0)),
        )
        .unwrap();
    table.toggle_tap(card);
    table.set_counters(card, 1, true);
}

#[test]
fn test_rewind_and_replay() {
    let mut table = dealt();
    let initial = snapshot(&table);

    for turn in 0..4 {
        play_turn(&mut table, turn);
    }
    let after_four = snapshot(&table);
    assert_eq!(table.turn(), 5);
    assert_eq!(table.zones.len(Zone::Battlefield), 4);

    // Rewind the last two turns (four operations each)
    for _ in 0..8 {
        assert!(table.undo());
    }
    assert_eq!(table.turn(), 3);
    assert_eq!(table.zones.len(Zone::Battlefield), 2);

    // Without shuffles the replay reproduces the same table
    for turn in 2..4 {
        play_turn(&mut table, turn);
    }
    assert_eq!(snapshot(&table), after_four);

    // Rewind everything
    while table.undo() {}
    assert_eq!(snapshot(&table), initial);
    assert_eq!(table.turn(), 1);
}

#[test]
fn test_action_log_contents() {
    let mut table = dealt();
    assert!(table.undo_log.is_empty());

    let card = table.zone(Zone::Hand)[3].id();
    table
        .transfer_zone(card, Zone::Hand, Zone::Graveyard, None)
        .unwrap();
    table.draw(2);

    let actions = table.undo_log.actions();
    assert_eq!(actions.len(), 3);
    assert!(matches!(
        actions[0],
        TableAction::MoveCard {
            card_id,
            from: Zone::Hand,
            from_index: 3,
            to: Zone::Graveyard,
            ..
        } if card_id == card
    ));
    assert!(matches!(actions[2], TableAction::MoveCard { from: Zone::Library, to: Zone::Hand, .. }));

    // Undo takes back the whole draw, then the discard
    assert!(table.undo());
    assert_eq!(table.undo_log.len(), 1);
    assert!(table.undo());
    assert_eq!(table.zone(Zone::Hand)[3].id(), card);
    assert!(!table.undo());
}

#[test]
fn test_rejected_moves_are_not_logged() {
    let mut table = dealt();
    let card: CardId = table.zone(Zone::Hand)[0].id();

    table
        .transfer_zone(card, Zone::Hand, Zone::Command, None)
        .unwrap();
    table.toggle_tap(card);

    assert!(table.undo_log.is_empty());
    assert!(!table.undo());
}
