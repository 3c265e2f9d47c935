//! Property tests: table invariants under arbitrary operation sequences

use goldfish::core::{Card, CardId, Point};
use goldfish::loader::DeckInfo;
use goldfish::table::{GameDetails, ManaColor, TableConfig, TableState, TransferOutcome};
use goldfish::zones::Zone;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

const MAIN: u32 = 30;
const COMMANDERS: u32 = 2;
const TOTAL: u32 = MAIN + COMMANDERS;

#[derive(Debug, Clone)]
enum Op {
    Draw(usize),
    Shuffle(usize),
    Tap(u32),
    Transform(u32),
    Counters(u32, i32, bool),
    Bottom(u32),
    UntapAll,
    NextTurn,
    Transfer(u32, usize, Option<(f32, f32)>),
    Life(i32),
    Mana(usize, i32),
}

fn op() -> impl Strategy<Value = Op> {
    let card = 0..TOTAL;
    let zone = 0..Zone::ALL.len();
    prop_oneof![
        (0usize..5).prop_map(Op::Draw),
        zone.clone().prop_map(Op::Shuffle),
        card.clone().prop_map(Op::Tap),
        card.clone().prop_map(Op::Transform),
        (card.clone(), -3i32..4, any::<bool>()).prop_map(|(c, n, r)| Op::Counters(c, n, r)),
        card.clone().prop_map(Op::Bottom),
        Just(Op::UntapAll),
        Just(Op::NextTurn),
        (
            card,
            zone,
            proptest::option::of((0f32..1500.0, 0f32..600.0))
        )
            .prop_map(|(c, z, p)| Op::Transfer(c, z, p)),
        (-10i32..10).prop_map(Op::Life),
        (0..ManaColor::ALL.len(), -3i32..4).prop_map(|(c, n)| Op::Mana(c, n)),
    ]
}

fn table(seed: u64) -> TableState {
    let commanders = (0..COMMANDERS)
        .map(|i| Card::new(CardId::new(i), format!("General {i}")).as_commander())
        .collect();
    let mainboard = (COMMANDERS..TOTAL)
        .map(|i| Card::new(CardId::new(i), format!("Card {}", i % 7)))
        .collect();
    let mut table = TableState::new(TableConfig::with_seed(seed));
    table.logger.enable_capture();
    table
        .start_game(
            Some(DeckInfo {
                mainboard,
                commanders,
            }),
            None,
        )
        .unwrap();
    table
}

/// Apply an op; returns the transfer outcome for transfers
fn apply(table: &mut TableState, op: &Op) -> Option<TransferOutcome> {
    match *op {
        Op::Draw(n) => {
            table.draw(n);
        }
        Op::Shuffle(z) => table.shuffle(Zone::ALL[z]),
        Op::Tap(c) => {
            table.toggle_tap(CardId::new(c));
        }
        Op::Transform(c) => {
            table.toggle_transform(CardId::new(c));
        }
        Op::Counters(c, n, relative) => {
            table.set_counters(CardId::new(c), n, relative);
        }
        Op::Bottom(c) => {
            table.put_on_library_bottom(CardId::new(c));
        }
        Op::UntapAll => table.untap_all(),
        Op::NextTurn => table.next_turn(),
        Op::Life(delta) => {
            table.adjust_life(delta);
        }
        Op::Mana(color, delta) => {
            table.adjust_mana(ManaColor::ALL[color], delta);
        }
        Op::Transfer(c, z, point) => {
            let card = CardId::new(c);
            let source = table.card(card)?.0;
            let drop = point.map(|(x, y)| Point::new(x, y));
            return Some(
                table
                    .transfer_zone(card, source, Zone::ALL[z], drop)
                    .unwrap(),
            );
        }
    }
    None
}

fn check_invariants(table: &TableState) -> Result<(), TestCaseError> {
    // Every card in exactly one zone
    let mut seen = FxHashSet::default();
    for zone in Zone::ALL {
        for zc in table.zone(zone) {
            prop_assert!(seen.insert(zc.id()), "{} appears twice", zc.id());
        }
    }
    prop_assert_eq!(seen.len(), TOTAL as usize);

    // Battlefield-only state never survives outside the battlefield
    for zone in Zone::ALL {
        for zc in table.zone(zone) {
            if zone == Zone::Battlefield {
                prop_assert!(zc.position.is_some() && zc.stack_order.is_some());
            } else {
                prop_assert!(!zc.tapped);
                prop_assert_eq!(zc.counters, 0);
                prop_assert!(zc.position.is_none() && zc.stack_order.is_none());
            }
            if zone == Zone::Command {
                prop_assert!(zc.card.commander);
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..60)) {
        let mut table = table(seed);
        check_invariants(&table)?;

        for op in &ops {
            let max_before = table.zones.max_stack_order(Zone::Battlefield);
            let outcome = apply(&mut table, op);
            check_invariants(&table)?;

            // Cards dropped onto the battlefield land above everything there
            if let (Op::Transfer(c, _, _), Some(TransferOutcome::Moved | TransferOutcome::Repositioned)) = (op, outcome) {
                if let Some((Zone::Battlefield, zc)) = table.card(CardId::new(*c)) {
                    prop_assert_eq!(zc.stack_order, Some(max_before + 1));
                }
            }
        }
    }

    #[test]
    fn prop_rejected_transfer_changes_nothing(seed in any::<u64>(), card in COMMANDERS..TOTAL) {
        let mut table = table(seed);
        let card = CardId::new(card);
        let source = table.card(card).unwrap().0;
        let before: Vec<_> = Zone::ALL.iter().map(|&z| table.zone(z).to_vec()).collect();

        let outcome = table.transfer_zone(card, source, Zone::Command, None).unwrap();

        prop_assert_eq!(outcome, TransferOutcome::Rejected);
        let after: Vec<_> = Zone::ALL.iter().map(|&z| table.zone(z).to_vec()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_draw_clamps(seed in any::<u64>(), n in 0usize..100) {
        let mut table = table(seed);
        let library = table.zones.len(Zone::Library);
        let hand = table.zones.len(Zone::Hand);

        let drawn = table.draw(n);

        prop_assert_eq!(drawn, n.min(library));
        prop_assert_eq!(table.zones.len(Zone::Hand), hand + drawn);
        prop_assert_eq!(table.zones.len(Zone::Library), library - drawn);
    }

    #[test]
    fn prop_undo_restores_deal(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..30)) {
        let mut table = table(seed);
        let dealt: Vec<_> = Zone::ALL.iter().map(|&z| table.zone(z).to_vec()).collect();

        for op in &ops {
            apply(&mut table, op);
        }
        while table.undo() {}

        let restored: Vec<_> = Zone::ALL.iter().map(|&z| table.zone(z).to_vec()).collect();
        prop_assert_eq!(dealt, restored);
        prop_assert_eq!(table.turn(), 1);
        prop_assert_eq!(*table.details(), GameDetails::new(table.config.starting_life));
    }
}
