//! Card identity as supplied by the deck loader

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// Separator used in the names of double-faced cards
/// (e.g. "Delver of Secrets // Insectile Aberration")
pub const FACE_SEPARATOR: &str = "//";

/// An immutable card from a deck list
///
/// The table never edits a `Card`; play state lives in
/// [`ZoneCard`](crate::zones::ZoneCard), which shares the card behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID within the deck
    pub id: CardId,

    /// Card name (e.g., "Lightning Bolt")
    pub name: String,

    /// Set code used for image lookup (e.g., "M11"); may be empty
    #[serde(default)]
    pub set: String,

    /// Is this card allowed in the command zone?
    #[serde(default)]
    pub commander: bool,

    #[serde(default)]
    pub foil: bool,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Card {
            id,
            name: name.into(),
            set: String::new(),
            commander: false,
            foil: false,
        }
    }

    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = set.into();
        self
    }

    pub fn as_commander(mut self) -> Self {
        self.commander = true;
        self
    }

    pub fn as_foil(mut self) -> Self {
        self.foil = true;
        self
    }

    /// Does this card have an alternate face?
    pub fn is_double_faced(&self) -> bool {
        self.name.contains(FACE_SEPARATOR)
    }

    /// Name of the front face (the whole name for single-faced cards)
    pub fn front_name(&self) -> &str {
        match self.name.split_once(FACE_SEPARATOR) {
            Some((front, _)) => front.trim(),
            None => &self.name,
        }
    }
}
