//! Table state and the zone transition operations

use crate::core::{CardId, Point};
use crate::loader::DeckInfo;
use crate::table::config::TableConfig;
use crate::table::details::{GameDetails, ManaColor};
use crate::table::logger::{TableLogger, VerbosityLevel};
use crate::table::setup::{self, HandSetup};
use crate::table::transitions::{self, TransferOutcome, TransferPlan};
use crate::undo::{TableAction, UndoLog};
use crate::zones::{Zone, ZoneCard, ZoneStore};
use crate::{GoldfishError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::sync::Arc;

/// Complete state of one practice table
///
/// Every public operation is one user-level action: it marks an undo
/// checkpoint, applies its changes to the zone store, and logs them. The
/// no-op cases (tapping a card in hand, drawing from an empty library, ...)
/// report `false`/`0` instead of erroring.
#[derive(Debug, Clone)]
pub struct TableState {
    /// Where every card is; the single source of truth
    pub zones: ZoneStore,

    pub config: TableConfig,

    /// Deck the current game was dealt from (reused by restart)
    deck: Option<DeckInfo>,

    /// Shuffle RNG, seeded from the config for reproducible sessions
    rng: ChaCha12Rng,

    turn: u32,

    /// Life total and mana pool
    details: GameDetails,

    pub undo_log: UndoLog,

    pub logger: TableLogger,
}

impl TableState {
    pub fn new(config: TableConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        let details = GameDetails::new(config.starting_life);
        TableState {
            zones: ZoneStore::new(),
            config,
            deck: None,
            rng,
            turn: 0,
            details,
            undo_log: UndoLog::new(),
            logger: TableLogger::new(),
        }
    }

    pub fn deck(&self) -> Option<&DeckInfo> {
        self.deck.as_ref()
    }

    /// Turn number, starting at 1 once a deck is dealt
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn details(&self) -> &GameDetails {
        &self.details
    }

    pub fn zone(&self, zone: Zone) -> &[ZoneCard] {
        self.zones.zone(zone)
    }

    /// Find a card anywhere on the table
    pub fn card(&self, card_id: CardId) -> Option<(Zone, &ZoneCard)> {
        self.zones.find(card_id)
    }

    /// Discard all zone state and deal from `deck`
    ///
    /// The main deck is shuffled into the library, the opening hand is drawn
    /// from its top (after placing any cards `hand` names), and commanders go
    /// to the command zone. With no deck the table is simply emptied.
    pub fn start_game(&mut self, deck: Option<DeckInfo>, hand: Option<&HandSetup>) -> Result<()> {
        if let (Some(deck), Some(hand)) = (&deck, hand) {
            hand.validate(&deck.mainboard, self.config.starting_hand_size)?;
        }

        self.zones.clear();
        self.undo_log.clear();
        self.turn = 0;
        self.details = GameDetails::new(self.config.starting_life);

        if let Some(deck) = &deck {
            let library = deck
                .mainboard
                .iter()
                .map(|card| ZoneCard::new(Arc::new(card.clone())))
                .collect();
            let command = deck
                .commanders
                .iter()
                .map(|card| ZoneCard::new(Arc::new(card.clone())))
                .collect();
            self.zones.set_zone(Zone::Library, library);
            self.zones.set_zone(Zone::Command, command);
            self.shuffle_zone(Zone::Library);
            setup::deal_opening_hand(self, hand)?;
            self.turn = 1;

            self.logger.minimal(&format!(
                "Dealt {} cards: {} in hand, {} in library, {} in command zone",
                deck.len(),
                self.zones.len(Zone::Hand),
                self.zones.len(Zone::Library),
                self.zones.len(Zone::Command)
            ));
        } else {
            self.logger.minimal("Table cleared");
        }

        // Dealing is not an undoable action
        self.undo_log.clear();
        self.deck = deck;
        Ok(())
    }

    /// Re-deal the current deck from scratch
    pub fn restart(&mut self) -> Result<()> {
        let deck = self.deck.clone();
        self.start_game(deck, None)
    }

    /// Move the top `n` library cards to the hand, keeping their order
    ///
    /// Returns how many cards moved (fewer than `n` when the library runs out).
    pub fn draw(&mut self, n: usize) -> usize {
        self.undo_log.mark_checkpoint();
        self.draw_cards(n)
    }

    pub fn shuffle(&mut self, zone: Zone) {
        self.undo_log.mark_checkpoint();
        self.shuffle_zone(zone);
    }

    /// Tap or untap a battlefield card
    pub fn toggle_tap(&mut self, card_id: CardId) -> bool {
        self.undo_log.mark_checkpoint();
        let Some((zone, index)) = self.zones.locate(card_id) else {
            return false;
        };
        if !transitions::can_tap(zone) {
            self.log_ignored("tap", card_id, zone);
            return false;
        }
        let record = &self.zones.zone(zone)[index];
        let updated = record.with_tapped(!record.tapped);
        self.update_record(zone, index, updated, true);
        true
    }

    /// Flip a card to its other face (anywhere but the library)
    pub fn toggle_transform(&mut self, card_id: CardId) -> bool {
        self.undo_log.mark_checkpoint();
        let Some((zone, index)) = self.zones.locate(card_id) else {
            return false;
        };
        if !transitions::can_transform(zone) {
            self.log_ignored("transform", card_id, zone);
            return false;
        }
        let record = &self.zones.zone(zone)[index];
        let updated = record.with_transformed(!record.transformed);
        self.update_record(zone, index, updated, true);
        true
    }

    /// Adjust (`relative`) or set a battlefield card's counters
    pub fn set_counters(&mut self, card_id: CardId, amount: i32, relative: bool) -> bool {
        self.undo_log.mark_checkpoint();
        let Some((zone, index)) = self.zones.locate(card_id) else {
            return false;
        };
        if !transitions::can_hold_counters(zone) {
            self.log_ignored("counters", card_id, zone);
            return false;
        }
        let record = &self.zones.zone(zone)[index];
        let counters = transitions::next_counters(record.counters, amount, relative);
        let updated = record.with_counters(counters);
        self.update_record(zone, index, updated, true);
        true
    }

    /// Put a card on the bottom of the library, fully reset
    pub fn put_on_library_bottom(&mut self, card_id: CardId) -> bool {
        self.undo_log.mark_checkpoint();
        let Some((zone, record)) = self.zones.find(card_id) else {
            return false;
        };
        let reset = record.reset();
        self.relocate(zone, card_id, Zone::Library, Some(0), reset)
    }

    /// Untap every battlefield card
    pub fn untap_all(&mut self) {
        self.undo_log.mark_checkpoint();
        self.untap_battlefield();
    }

    /// Untap everything, then draw a card
    pub fn next_turn(&mut self) {
        self.undo_log.mark_checkpoint();
        self.untap_battlefield();
        self.draw_cards(1);
        self.undo_log.log(TableAction::ChangeTurn {
            from_turn: self.turn,
            to_turn: self.turn + 1,
        });
        self.turn += 1;
        self.logger.minimal(&format!("Turn {}", self.turn));
    }

    /// Drag-and-drop transfer of a card from `source` to `target`
    ///
    /// `drop_point` is where the card was released, in the target zone's
    /// local coordinates; it only matters for the battlefield. The card must
    /// currently be in `source`.
    pub fn transfer_zone(
        &mut self,
        card_id: CardId,
        source: Zone,
        target: Zone,
        drop_point: Option<Point>,
    ) -> Result<TransferOutcome> {
        self.undo_log.mark_checkpoint();
        let index = self
            .zones
            .index_in(source, card_id)
            .ok_or(GoldfishError::CardNotInZone {
                card: card_id.as_u32(),
                zone: source,
            })?;

        let plan = transitions::plan_transfer(
            &self.zones.zone(source)[index],
            source,
            target,
            drop_point,
            self.zones.max_stack_order(Zone::Battlefield),
            self.config.zone_border_px,
        );
        let outcome = plan.outcome();

        match plan {
            TransferPlan::Reject => {
                self.logger.event(
                    VerbosityLevel::Verbose,
                    "transfer",
                    &format!("{} cannot enter the {} zone", self.describe(card_id), target),
                );
            }
            TransferPlan::Keep => {}
            TransferPlan::Reposition(updated) => {
                self.update_record(source, index, updated, false);
            }
            TransferPlan::Move(updated) => {
                self.relocate(source, card_id, target, None, updated);
            }
        }

        Ok(outcome)
    }

    /// Bring a card found by a search into the hand
    ///
    /// Searching the hand itself moves the chosen card to the end of the hand.
    pub fn retrieve(&mut self, card_id: CardId, source: Zone) -> Result<bool> {
        if source != Zone::Hand {
            return Ok(self
                .transfer_zone(card_id, source, Zone::Hand, None)?
                .changed_zone());
        }

        self.undo_log.mark_checkpoint();
        let record = self
            .zones
            .get(Zone::Hand, card_id)
            .cloned()
            .ok_or(GoldfishError::CardNotInZone {
                card: card_id.as_u32(),
                zone: Zone::Hand,
            })?;
        Ok(self.relocate(Zone::Hand, card_id, Zone::Hand, None, record))
    }

    /// Gain (positive) or lose (negative) life; returns the new total
    pub fn adjust_life(&mut self, delta: i32) -> i32 {
        self.undo_log.mark_checkpoint();
        let life = self.details.life.saturating_add(delta);
        self.update_details(self.details.with_life(life));
        life
    }

    pub fn set_life(&mut self, life: i32) {
        self.undo_log.mark_checkpoint();
        self.update_details(self.details.with_life(life));
    }

    /// Add or spend floating mana of one color; returns the new amount
    pub fn adjust_mana(&mut self, color: ManaColor, delta: i32) -> u32 {
        self.undo_log.mark_checkpoint();
        let updated = self.details.with_mana_adjusted(color, delta);
        self.update_details(updated);
        updated.mana(color)
    }

    pub fn empty_mana_pool(&mut self) {
        self.undo_log.mark_checkpoint();
        self.update_details(self.details.with_empty_pool());
    }

    /// Rewind the most recent user-level operation
    pub fn undo(&mut self) -> bool {
        let actions = self.undo_log.pop_operation();
        if actions.is_empty() {
            return false;
        }

        for action in actions {
            match action {
                TableAction::MoveCard {
                    card_id,
                    from,
                    from_index,
                    to,
                    before,
                } => {
                    self.zones.remove(to, card_id);
                    self.zones.insert(from, from_index, before);
                }
                TableAction::UpdateCard {
                    zone,
                    index,
                    before,
                } => {
                    self.zones.mark_animation(before.id());
                    self.zones.replace(zone, index, before);
                }
                TableAction::Reorder { zone, before } => {
                    self.zones.set_zone(zone, before);
                }
                TableAction::ChangeTurn { from_turn, .. } => {
                    self.turn = from_turn;
                }
                TableAction::UpdateDetails { before } => {
                    self.details = before;
                }
            }
        }

        self.logger.normal("Undid last action");
        true
    }

    pub(crate) fn draw_cards(&mut self, n: usize) -> usize {
        let library = self.zones.zone(Zone::Library);
        let count = n.min(library.len());
        let drawn: Vec<ZoneCard> = library[library.len() - count..].to_vec();

        for record in drawn {
            self.relocate(Zone::Library, record.id(), Zone::Hand, None, record);
        }

        if count < n {
            self.logger.event(
                VerbosityLevel::Verbose,
                "draw",
                &format!("Library ran out: drew {count} of {n}"),
            );
        }
        count
    }

    pub(crate) fn shuffle_zone(&mut self, zone: Zone) {
        self.undo_log.log(TableAction::Reorder {
            zone,
            before: self.zones.zone(zone).to_vec(),
        });
        self.zones.shuffle(zone, &mut self.rng);
        self.logger.event(
            VerbosityLevel::Normal,
            "shuffle",
            &format!("Shuffled {} ({} cards)", zone, self.zones.len(zone)),
        );
    }

    fn untap_battlefield(&mut self) {
        let tapped: Vec<(usize, ZoneCard)> = self
            .zones
            .zone(Zone::Battlefield)
            .iter()
            .enumerate()
            .filter(|(_, zc)| zc.tapped)
            .map(|(index, zc)| (index, zc.with_tapped(false)))
            .collect();
        let all: Vec<CardId> = self.zones.zone(Zone::Battlefield).iter().map(ZoneCard::id).collect();

        for (index, record) in tapped {
            self.update_record(Zone::Battlefield, index, record, false);
        }
        for card_id in all {
            self.zones.mark_animation(card_id);
        }
    }

    /// Move a card between (or within) zones, replacing its record
    ///
    /// `to_index` of `None` appends on top. Returns false if the card is not
    /// in `from`.
    pub(crate) fn relocate(
        &mut self,
        from: Zone,
        card_id: CardId,
        to: Zone,
        to_index: Option<usize>,
        record: ZoneCard,
    ) -> bool {
        let Some((from_index, before)) = self.zones.remove(from, card_id) else {
            return false;
        };
        match to_index {
            Some(index) => self.zones.insert(to, index, record),
            None => self.zones.push(to, record),
        }
        self.logger.event(
            VerbosityLevel::Normal,
            "transfer",
            &format!("{} ({}) {} -> {}", before.name(), card_id, from, to),
        );
        self.undo_log.log(TableAction::MoveCard {
            card_id,
            from,
            from_index,
            to,
            before,
        });
        true
    }

    fn update_record(&mut self, zone: Zone, index: usize, record: ZoneCard, animate: bool) {
        let card_id = record.id();
        if animate {
            self.zones.mark_animation(card_id);
        }
        let before = self.zones.replace(zone, index, record);
        self.logger.event(
            VerbosityLevel::Verbose,
            "update",
            &format!("{} ({}) updated in {}", before.name(), card_id, zone),
        );
        self.undo_log.log(TableAction::UpdateCard {
            zone,
            index,
            before,
        });
    }

    fn update_details(&mut self, updated: GameDetails) {
        if updated == self.details {
            return;
        }
        let before = std::mem::replace(&mut self.details, updated);
        self.logger.event(VerbosityLevel::Normal, "details", &updated.to_string());
        self.undo_log.log(TableAction::UpdateDetails { before });
    }

    fn log_ignored(&self, what: &str, card_id: CardId, zone: Zone) {
        self.logger.event(
            VerbosityLevel::Verbose,
            "ignored",
            &format!("{what} has no effect on {} in the {zone} zone", self.describe(card_id)),
        );
    }

    fn describe(&self, card_id: CardId) -> String {
        match self.zones.find(card_id) {
            Some((_, zc)) => format!("{} ({})", zc.name(), card_id),
            None => format!("card {card_id}"),
        }
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}
