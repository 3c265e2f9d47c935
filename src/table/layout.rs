//! Pointer hit-testing against the table layout

use crate::core::{CardId, Point, Rect};
use crate::table::config::{TableConfig, ZONE_PADDING_PX};
use crate::zones::{Zone, ZoneStore};

/// Answers "what is under the pointer" for drag and shortcut targeting
pub trait HitTest {
    /// Zone whose container contains `point`
    fn zone_at(&self, point: Point) -> Option<Zone>;

    /// Top-left corner of a zone's container in table coordinates
    fn zone_origin(&self, zone: Zone) -> Point;

    /// Card drawn topmost at `point`
    fn card_at(&self, point: Point, zones: &ZoneStore) -> Option<CardId>;

    /// Top-left corner of a card as currently drawn, in table coordinates
    fn card_origin(&self, card_id: CardId, zones: &ZoneStore) -> Option<Point>;
}

/// Fixed rectangles for each zone
///
/// The battlefield spans the top of the table. Hand and command zone lay
/// their cards out in a row; library, graveyard and exile are piles that
/// only show their top card.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneLayout {
    rects: [Rect; 6],
    zone_border_px: f32,
    card_width_px: f32,
    card_height_px: f32,
}

impl ZoneLayout {
    pub const TABLE_WIDTH_PX: f32 = 1600.0;
    pub const BATTLEFIELD_HEIGHT_PX: f32 = 620.0;
    pub const ROW_HEIGHT_PX: f32 = 220.0;

    pub fn new(config: &TableConfig) -> Self {
        let y = Self::BATTLEFIELD_HEIGHT_PX;
        let h = Self::ROW_HEIGHT_PX;
        let rect = |zone: Zone| match zone {
            Zone::Battlefield => Rect::new(0.0, 0.0, Self::TABLE_WIDTH_PX, y),
            Zone::Command => Rect::new(0.0, y, 320.0, h),
            Zone::Hand => Rect::new(320.0, y, 800.0, h),
            Zone::Library => Rect::new(1120.0, y, 160.0, h),
            Zone::Graveyard => Rect::new(1280.0, y, 160.0, h),
            Zone::Exile => Rect::new(1440.0, y, 160.0, h),
        };
        ZoneLayout {
            rects: Zone::ALL.map(rect),
            zone_border_px: config.zone_border_px,
            card_width_px: config.card_width_px,
            card_height_px: config.card_height_px,
        }
    }

    pub fn rect(&self, zone: Zone) -> Rect {
        self.rects[zone.index()]
    }

    /// Rectangle of the card at `index` in a row-laid zone of `len` cards
    ///
    /// Cards overlap once the row is full.
    fn row_slot(&self, zone: Zone, index: usize, len: usize) -> Rect {
        let rect = self.rect(zone);
        let inner = self.zone_border_px + ZONE_PADDING_PX;
        let available = (rect.width - 2.0 * inner - self.card_width_px).max(0.0);
        let step = if len > 1 {
            (available / (len - 1) as f32).min(self.card_width_px)
        } else {
            0.0
        };
        Rect::new(
            rect.origin.x + inner + step * index as f32,
            rect.origin.y + inner,
            self.card_width_px,
            self.card_height_px,
        )
    }

    fn battlefield_card(&self, position: Point) -> Rect {
        let origin = self.rect(Zone::Battlefield).origin
            + Point::new(self.zone_border_px, self.zone_border_px)
            + position;
        Rect::new(origin.x, origin.y, self.card_width_px, self.card_height_px)
    }
}

impl ZoneLayout {
    /// Where a card is drawn
    ///
    /// Piles draw every card at the same spot, so only the top one is ever
    /// visible there.
    pub fn card_rect(&self, card_id: CardId, zones: &ZoneStore) -> Option<Rect> {
        let (zone, index) = zones.locate(card_id)?;
        let rect = match zone {
            Zone::Battlefield => {
                self.battlefield_card(zones.zone(zone)[index].position.unwrap_or(Point::ORIGIN))
            }
            Zone::Hand | Zone::Command => self.row_slot(zone, index, zones.len(zone)),
            Zone::Library | Zone::Graveyard | Zone::Exile => self.pile_slot(zone),
        };
        Some(rect)
    }

    /// A point inside the visible part of a card, for pointing at it
    pub fn card_point(&self, card_id: CardId, zones: &ZoneStore) -> Option<Point> {
        self.card_rect(card_id, zones)
            .map(|rect| rect.origin + Point::new(4.0, 4.0))
    }

    fn pile_slot(&self, zone: Zone) -> Rect {
        let rect = self.rect(zone);
        let inner = self.zone_border_px + ZONE_PADDING_PX;
        Rect::new(
            rect.origin.x + inner,
            rect.origin.y + inner,
            self.card_width_px,
            self.card_height_px,
        )
    }
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

impl HitTest for ZoneLayout {
    fn zone_at(&self, point: Point) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|&zone| self.rect(zone).contains(point))
    }

    fn zone_origin(&self, zone: Zone) -> Point {
        self.rect(zone).origin
    }

    fn card_at(&self, point: Point, zones: &ZoneStore) -> Option<CardId> {
        let zone = self.zone_at(point)?;
        let cards = zones.zone(zone);

        match zone {
            Zone::Battlefield => cards
                .iter()
                .filter(|zc| {
                    self.battlefield_card(zc.position.unwrap_or(Point::ORIGIN))
                        .contains(point)
                })
                .max_by_key(|zc| zc.stack_order.unwrap_or(0))
                .map(|zc| zc.id()),
            Zone::Hand | Zone::Command => cards
                .iter()
                .enumerate()
                .rev()
                .find(|(i, _)| self.row_slot(zone, *i, cards.len()).contains(point))
                .map(|(_, zc)| zc.id()),
            Zone::Library | Zone::Graveyard | Zone::Exile => cards.last().map(|zc| zc.id()),
        }
    }

    fn card_origin(&self, card_id: CardId, zones: &ZoneStore) -> Option<Point> {
        self.card_rect(card_id, zones).map(|rect| rect.origin)
    }
}
