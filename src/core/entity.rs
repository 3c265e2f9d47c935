//! Card identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for cards in a deck
///
/// IDs are assigned densely when a deck is loaded and stay stable for the
/// lifetime of the table; a restart reuses the same deck and therefore the
/// same IDs. The display form doubles as the card element identifier that
/// presentation layers tag their card elements with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for CardId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(CardId)
    }
}

/// Hands out sequential card IDs while a deck is being built
#[derive(Debug, Clone, Default)]
pub struct CardIdAllocator {
    next_id: u32,
}

impl CardIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique CardId
    pub fn next_id(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = CardIdAllocator::new();
        assert_eq!(ids.next_id().as_u32(), 0);
        assert_eq!(ids.next_id().as_u32(), 1);
        assert_eq!(ids.next_id().as_u32(), 2);
    }

    #[test]
    fn test_parse_and_display() {
        let id: CardId = " 17 ".parse().unwrap();
        assert_eq!(id, CardId::new(17));
        assert_eq!(id.to_string(), "17");
        assert!("seventeen".parse::<CardId>().is_err());
    }
}
