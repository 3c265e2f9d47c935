//! Deck loading, deck persistence and card image lookup

pub mod deck;
pub mod images;
pub mod store;

pub use deck::{DeckEntry, DeckInfo, DeckList, DeckLoader};
pub use images::{CardImages, ImageLookup, ImageSlot, ImageState, UrlTemplateLookup};
pub use store::{DeckStore, JsonDeckStore, MemoryDeckStore};
