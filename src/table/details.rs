//! Per-game counters kept beside the zones: life total and mana pool
//!
//! Nothing on the table reads these; they are a scratch pad the player
//! updates by hand and that a restart resets.

use crate::table::config::STARTING_LIFE;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaColor {
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// One-letter mana symbol (W, U, B, R, G, C)
    pub fn symbol(self) -> char {
        match self {
            ManaColor::White => 'W',
            ManaColor::Blue => 'U',
            ManaColor::Black => 'B',
            ManaColor::Red => 'R',
            ManaColor::Green => 'G',
            ManaColor::Colorless => 'C',
        }
    }
}

impl fmt::Display for ManaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManaColor::White => "white",
            ManaColor::Blue => "blue",
            ManaColor::Black => "black",
            ManaColor::Red => "red",
            ManaColor::Green => "green",
            ManaColor::Colorless => "colorless",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ManaColor {
    type Err = String;

    /// Accepts the color name or its symbol, in any case
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ManaColor::ALL
            .into_iter()
            .find(|color| {
                lower == color.to_string() || lower == color.symbol().to_ascii_lowercase().to_string()
            })
            .ok_or_else(|| format!("unknown mana color '{s}' (expected one of W U B R G C)"))
    }
}

/// Life total and floating mana for the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    /// May go negative; the table does not end the game
    pub life: i32,
    /// Indexed in [`ManaColor::ALL`] order
    pub mana: [u32; 6],
}

impl GameDetails {
    pub fn new(starting_life: i32) -> Self {
        GameDetails {
            life: starting_life,
            mana: [0; 6],
        }
    }

    pub fn mana(&self, color: ManaColor) -> u32 {
        self.mana[color.index()]
    }

    pub fn total_mana(&self) -> u32 {
        self.mana.iter().sum()
    }

    pub fn with_life(self, life: i32) -> Self {
        GameDetails { life, ..self }
    }

    /// Add `delta` mana of one color; the pool never drops below zero
    pub fn with_mana_adjusted(self, color: ManaColor, delta: i32) -> Self {
        let mut mana = self.mana;
        let current = mana[color.index()];
        mana[color.index()] = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        GameDetails { mana, ..self }
    }

    pub fn with_empty_pool(self) -> Self {
        GameDetails {
            mana: [0; 6],
            ..self
        }
    }
}

impl Default for GameDetails {
    fn default() -> Self {
        Self::new(STARTING_LIFE)
    }
}

impl fmt::Display for GameDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Life {} | Mana", self.life)?;
        for color in ManaColor::ALL {
            write!(f, " {}{}", color.symbol(), self.mana(color))?;
        }
        Ok(())
    }
}
