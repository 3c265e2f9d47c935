//! Table zones (Library, Hand, Battlefield, etc.) and the zone store

use crate::core::{Card, CardId, Point};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Command,
}

impl Zone {
    pub const ALL: [Zone; 6] = [
        Zone::Library,
        Zone::Hand,
        Zone::Battlefield,
        Zone::Graveyard,
        Zone::Exile,
        Zone::Command,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Zone::Library => 0,
            Zone::Hand => 1,
            Zone::Battlefield => 2,
            Zone::Graveyard => 3,
            Zone::Exile => 4,
            Zone::Command => 5,
        }
    }

    /// Identifier a presentation layer tags the zone's root element with
    pub fn dom_id(self) -> &'static str {
        match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Command => "command",
        }
    }

    /// Parse a zone from its element identifier (case-insensitive)
    pub fn from_dom_id(id: &str) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|z| z.dom_id().eq_ignore_ascii_case(id.trim()))
    }

    /// Free-form zones position cards by coordinates instead of slots
    pub fn is_free_form(self) -> bool {
        self == Zone::Battlefield
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// Play state wrapped around one card
///
/// Records are values: every change (including tap and transform) builds a
/// new record which then replaces the old one in its zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCard {
    pub card: Arc<Card>,

    /// Rotated 90 degrees (battlefield only)
    pub tapped: bool,

    /// Showing the alternate face
    pub transformed: bool,

    /// Signed counter value (battlefield only)
    pub counters: i32,

    /// Offset inside the battlefield; `None` in slot-based zones
    pub position: Option<Point>,

    /// Paint order on the battlefield; `None` elsewhere
    pub stack_order: Option<u32>,
}

impl ZoneCard {
    pub fn new(card: Arc<Card>) -> Self {
        ZoneCard {
            card,
            tapped: false,
            transformed: false,
            counters: 0,
            position: None,
            stack_order: None,
        }
    }

    pub fn id(&self) -> CardId {
        self.card.id
    }

    pub fn name(&self) -> &str {
        &self.card.name
    }

    pub fn with_tapped(&self, tapped: bool) -> Self {
        ZoneCard {
            tapped,
            ..self.clone()
        }
    }

    pub fn with_transformed(&self, transformed: bool) -> Self {
        ZoneCard {
            transformed,
            ..self.clone()
        }
    }

    pub fn with_counters(&self, counters: i32) -> Self {
        ZoneCard {
            counters,
            ..self.clone()
        }
    }

    /// Place the card at a free-form battlefield position
    pub fn placed_at(&self, position: Point, stack_order: u32) -> Self {
        ZoneCard {
            position: Some(position),
            stack_order: Some(stack_order),
            ..self.clone()
        }
    }

    /// Clear battlefield-only state; the visible face is kept
    pub fn left_battlefield(&self) -> Self {
        ZoneCard {
            transformed: self.transformed,
            ..self.reset()
        }
    }

    /// A fresh face-up, front-side record for the same card
    pub fn reset(&self) -> Self {
        ZoneCard::new(Arc::clone(&self.card))
    }
}

/// Holds every zone's ordered contents
///
/// Order matters everywhere: the last element is the top of the Library and
/// the most recently added card of the Hand. The store performs no
/// validation; the transition rules in [`crate::table`] decide what is legal.
///
/// Besides the contents, the store owns the ephemeral presentation signals:
/// zones changed since the last render, cards with a pending one-shot
/// animation, and zones that were just shuffled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneStore {
    zones: [Vec<ZoneCard>; 6],
    pending_animations: FxHashSet<CardId>,
    shuffled: SmallVec<[Zone; 2]>,
    dirty: SmallVec<[Zone; 6]>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a zone, bottom to top
    pub fn zone(&self, zone: Zone) -> &[ZoneCard] {
        &self.zones[zone.index()]
    }

    /// Replace a zone's contents
    pub fn set_zone(&mut self, zone: Zone, cards: Vec<ZoneCard>) {
        self.zones[zone.index()] = cards;
        self.mark_dirty(zone);
    }

    pub fn len(&self, zone: Zone) -> usize {
        self.zones[zone.index()].len()
    }

    pub fn is_empty(&self, zone: Zone) -> bool {
        self.zones[zone.index()].is_empty()
    }

    /// Total cards across all zones
    pub fn total_cards(&self) -> usize {
        self.zones.iter().map(Vec::len).sum()
    }

    /// Find which zone holds a card and at what index
    pub fn locate(&self, card_id: CardId) -> Option<(Zone, usize)> {
        Zone::ALL.into_iter().find_map(|zone| {
            self.index_in(zone, card_id).map(|index| (zone, index))
        })
    }

    pub fn find(&self, card_id: CardId) -> Option<(Zone, &ZoneCard)> {
        let (zone, index) = self.locate(card_id)?;
        Some((zone, &self.zones[zone.index()][index]))
    }

    pub fn index_in(&self, zone: Zone, card_id: CardId) -> Option<usize> {
        self.zones[zone.index()].iter().position(|zc| zc.id() == card_id)
    }

    pub fn get(&self, zone: Zone, card_id: CardId) -> Option<&ZoneCard> {
        self.zones[zone.index()].iter().find(|zc| zc.id() == card_id)
    }

    /// Swap in a new record at `index`, returning the old one
    pub fn replace(&mut self, zone: Zone, index: usize, record: ZoneCard) -> ZoneCard {
        self.mark_dirty(zone);
        std::mem::replace(&mut self.zones[zone.index()][index], record)
    }

    /// Remove a card from a zone, returning its former index and record
    pub fn remove(&mut self, zone: Zone, card_id: CardId) -> Option<(usize, ZoneCard)> {
        let index = self.index_in(zone, card_id)?;
        self.mark_dirty(zone);
        Some((index, self.zones[zone.index()].remove(index)))
    }

    /// Insert at `index`, clamped to the zone length (0 = bottom)
    pub fn insert(&mut self, zone: Zone, index: usize, record: ZoneCard) {
        let cards = &mut self.zones[zone.index()];
        let index = index.min(cards.len());
        cards.insert(index, record);
        self.mark_dirty(zone);
    }

    /// Add on top of a zone
    pub fn push(&mut self, zone: Zone, record: ZoneCard) {
        self.zones[zone.index()].push(record);
        self.mark_dirty(zone);
    }

    /// Highest stack order present in a zone (0 when there is none)
    pub fn max_stack_order(&self, zone: Zone) -> u32 {
        self.zones[zone.index()]
            .iter()
            .filter_map(|zc| zc.stack_order)
            .max()
            .unwrap_or(0)
    }

    /// Shuffle a zone in place with the given RNG
    pub fn shuffle(&mut self, zone: Zone, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.zones[zone.index()].shuffle(rng);
        self.mark_dirty(zone);
        if !self.shuffled.contains(&zone) {
            self.shuffled.push(zone);
        }
    }

    /// Was this zone shuffled since the last call? Clears the signal.
    pub fn take_shuffle(&mut self, zone: Zone) -> bool {
        match self.shuffled.iter().position(|&z| z == zone) {
            Some(pos) => {
                self.shuffled.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Request a one-shot transition animation for a card
    pub fn mark_animation(&mut self, card_id: CardId) {
        self.pending_animations.insert(card_id);
    }

    /// Consume the animation hint for a card
    pub fn take_animation(&mut self, card_id: CardId) -> bool {
        self.pending_animations.remove(&card_id)
    }

    pub fn has_pending_animation(&self, card_id: CardId) -> bool {
        self.pending_animations.contains(&card_id)
    }

    /// Zones modified since the last call, in modification order
    pub fn take_dirty_zones(&mut self) -> SmallVec<[Zone; 6]> {
        std::mem::take(&mut self.dirty)
    }

    /// Drop all cards and signals
    pub fn clear(&mut self) {
        for zone in Zone::ALL {
            self.zones[zone.index()].clear();
            self.mark_dirty(zone);
        }
        self.pending_animations.clear();
        self.shuffled.clear();
    }

    fn mark_dirty(&mut self, zone: Zone) {
        if !self.dirty.contains(&zone) {
            self.dirty.push(zone);
        }
    }
}
