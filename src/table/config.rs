//! Table configuration

use serde::{Deserialize, Serialize};

/// Cards dealt into the opening hand
pub const STARTING_HAND_SIZE: usize = 7;

/// Life total every game starts at
pub const STARTING_LIFE: i32 = 20;

/// Border drawn around each zone, in pixels
pub const ZONE_BORDER_PX: f32 = 2.0;

/// Inner padding of slot-based zones, in pixels
pub const ZONE_PADDING_PX: f32 = 8.0;

pub const CARD_WIDTH_PX: f32 = 146.0;
pub const CARD_HEIGHT_PX: f32 = 204.0;

/// Settings for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub starting_hand_size: usize,

    pub starting_life: i32,

    /// Subtracted from battlefield drop points so a card lands where its
    /// element was released rather than offset by the zone border
    pub zone_border_px: f32,

    pub card_width_px: f32,
    pub card_height_px: f32,

    /// RNG seed for shuffles; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            starting_hand_size: STARTING_HAND_SIZE,
            starting_life: STARTING_LIFE,
            zone_border_px: ZONE_BORDER_PX,
            card_width_px: CARD_WIDTH_PX,
            card_height_px: CARD_HEIGHT_PX,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn with_seed(seed: u64) -> Self {
        TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        }
    }
}
