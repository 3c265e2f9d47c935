//! Goldfish - a solo practice table for trading card game decks
//!
//! Cards live in six zones (library, hand, battlefield, graveyard, exile and
//! the command zone) and move between them by drag-and-drop, keyboard
//! shortcuts and zone searches. Nothing enforces game rules; the table only
//! keeps every card in exactly one zone and tracks its play state.

pub mod core;
pub mod error;
pub mod loader;
pub mod table;
pub mod undo;
pub mod zones;

pub use error::{GoldfishError, Result};
