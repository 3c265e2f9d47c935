//! Deck and card-image persistence
//!
//! The table only needs "give me the deck" and "remember this deck"; card
//! blobs cache downloaded images by card name. Writes are serialized by the
//! store itself, and no transaction spans more than one call.

use crate::core::Card;
use crate::loader::deck::DeckInfo;
use crate::{GoldfishError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value store for decks and card image blobs
pub trait DeckStore {
    /// The first stored deck, if any
    fn get_deck(&self) -> Result<Option<DeckInfo>>;

    fn put_deck(&self, cards: &[Card], name: &str) -> Result<()>;

    fn get_card_blob(&self, name: &str) -> Result<Option<Vec<u8>>>;

    fn put_card_blob(&self, blob: &[u8], name: &str) -> Result<()>;
}

/// Convert a deck or card name into a file name
/// "Lightning Bolt" -> "lightning_bolt"
/// "All Hallow's Eve" -> "all_hallows_eve"
fn name_to_file_stem(name: &str) -> String {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' | '/' => Some('_'),
            c if c.is_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if normalized.is_empty() {
        "_".to_string()
    } else {
        normalized
    }
}

/// In-memory store, used by tests and by the CLI when no directory is given
#[derive(Debug, Default)]
pub struct MemoryDeckStore {
    /// Decks by name; the first in name order is "the" deck
    decks: Mutex<BTreeMap<String, Vec<Card>>>,
    blobs: Mutex<FxHashMap<String, Vec<u8>>>,
}

impl MemoryDeckStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> GoldfishError {
    GoldfishError::Store("store lock poisoned".to_string())
}

impl DeckStore for MemoryDeckStore {
    fn get_deck(&self) -> Result<Option<DeckInfo>> {
        let decks = self.decks.lock().map_err(poisoned)?;
        Ok(decks
            .values()
            .next()
            .map(|cards| DeckInfo::from_cards(cards.clone())))
    }

    fn put_deck(&self, cards: &[Card], name: &str) -> Result<()> {
        self.decks
            .lock()
            .map_err(poisoned)?
            .insert(name.to_string(), cards.to_vec());
        Ok(())
    }

    fn get_card_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().map_err(poisoned)?.get(name).cloned())
    }

    fn put_card_blob(&self, blob: &[u8], name: &str) -> Result<()> {
        self.blobs
            .lock()
            .map_err(poisoned)?
            .insert(name.to_string(), blob.to_vec());
        Ok(())
    }
}

/// On-disk deck file (`decks/<name>.json`)
#[derive(Debug, Serialize, Deserialize)]
struct StoredDeck {
    name: String,
    cards: Vec<Card>,
}

/// Directory-backed store: decks as JSON, blobs as raw files
///
/// ```text
/// <root>/decks/<deck_name>.json
/// <root>/cards/<card_name>.bin
/// ```
#[derive(Debug, Clone)]
pub struct JsonDeckStore {
    root: PathBuf,
}

impl JsonDeckStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("decks"))?;
        fs::create_dir_all(root.join("cards"))?;
        Ok(JsonDeckStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn deck_path(&self, name: &str) -> PathBuf {
        self.root
            .join("decks")
            .join(format!("{}.json", name_to_file_stem(name)))
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.root
            .join("cards")
            .join(format!("{}.bin", name_to_file_stem(name)))
    }
}

impl DeckStore for JsonDeckStore {
    fn get_deck(&self) -> Result<Option<DeckInfo>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(self.root.join("decks"))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let Some(first) = paths.first() else {
            return Ok(None);
        };
        let json = fs::read_to_string(first)?;
        let stored: StoredDeck = serde_json::from_str(&json)?;
        Ok(Some(DeckInfo::from_cards(stored.cards)))
    }

    /// Store a deck, replacing any deck saved under the same name
    ///
    /// Distinct names can share a file name; a put that would overwrite a
    /// different deck is refused.
    fn put_deck(&self, cards: &[Card], name: &str) -> Result<()> {
        let path = self.deck_path(name);
        match fs::read_to_string(&path) {
            Ok(json) => {
                let existing: StoredDeck = serde_json::from_str(&json)?;
                if existing.name != name {
                    return Err(GoldfishError::Store(format!(
                        "deck name '{}' clashes with stored deck '{}' ({})",
                        name,
                        existing.name,
                        path.display()
                    )));
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let stored = StoredDeck {
            name: name.to_string(),
            cards: cards.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn get_card_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_card_blob(&self, blob: &[u8], name: &str) -> Result<()> {
        fs::write(self.blob_path(name), blob)?;
        Ok(())
    }
}
