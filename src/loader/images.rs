//! Card image resolution
//!
//! Image URLs are resolved asynchronously, one lookup per card slot. A slot
//! that is rebound to another card (or dropped) aborts its pending lookup,
//! and a result produced for an earlier binding is never applied: showing
//! the previous card's image on the new card is the failure this guards
//! against.

use crate::core::{Card, CardId};
use crate::{GoldfishError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Image URLs for both faces of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImages {
    pub front: String,
    /// Only double-faced cards have a back image
    pub back: Option<String>,
}

/// Resolves a card's images by name and set code
pub trait ImageLookup: Send + Sync + 'static {
    fn lookup(&self, name: &str, set: &str) -> impl Future<Output = Result<CardImages>> + Send;
}

/// Builds image URLs from a service base URL without any network access
///
/// `{base}/cards/named?exact=<name>&format=image&set=<set>`, with
/// `&face=back` for the back face of double-faced cards.
#[derive(Debug, Clone)]
pub struct UrlTemplateLookup {
    base_url: String,
}

impl UrlTemplateLookup {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.scryfall.com";

    pub fn new(base_url: impl Into<String>) -> Self {
        UrlTemplateLookup {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, name: &str, set: &str, back: bool) -> String {
        let mut url = format!(
            "{}/cards/named?exact={}&format=image",
            self.base_url,
            encode_query(name)
        );
        if !set.is_empty() {
            url.push_str("&set=");
            url.push_str(&encode_query(set));
        }
        if back {
            url.push_str("&face=back");
        }
        url
    }
}

impl Default for UrlTemplateLookup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl ImageLookup for UrlTemplateLookup {
    fn lookup(&self, name: &str, set: &str) -> impl Future<Output = Result<CardImages>> + Send {
        let result = if name.trim().is_empty() {
            Err(GoldfishError::ImageLookup("card has no name".to_string()))
        } else {
            let double_faced = name.contains(crate::core::card::FACE_SEPARATOR);
            Ok(CardImages {
                front: self.url(name, set, false),
                back: double_faced.then(|| self.url(name, set, true)),
            })
        };
        std::future::ready(result)
    }
}

// Query-string encoding: unreserved characters pass, spaces become '+'
fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// What a card slot currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    /// Nothing bound, or the lookup failed: show the card back
    FaceDown,
    /// Lookup in flight: show the loading placeholder
    Loading,
    Loaded(CardImages),
}

/// One visual card slot and its (at most one) pending lookup
///
/// Binding spawns the lookup on the current tokio runtime, so `bind` must be
/// called from within one.
pub struct ImageSlot<L: ImageLookup> {
    lookup: Arc<L>,
    card: Option<CardId>,
    generation: u64,
    pending: Option<(u64, JoinHandle<Result<CardImages>>)>,
    state: ImageState,
}

impl<L: ImageLookup> ImageSlot<L> {
    pub fn new(lookup: Arc<L>) -> Self {
        ImageSlot {
            lookup,
            card: None,
            generation: 0,
            pending: None,
            state: ImageState::FaceDown,
        }
    }

    pub fn card(&self) -> Option<CardId> {
        self.card
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Show `card` in this slot, starting a lookup unless it is already bound
    pub fn bind(&mut self, card: &Card) {
        if self.card == Some(card.id) {
            return;
        }
        self.cancel();
        self.generation += 1;
        self.card = Some(card.id);
        self.state = ImageState::Loading;

        let lookup = Arc::clone(&self.lookup);
        let name = card.name.clone();
        let set = card.set.clone();
        let handle = tokio::spawn(async move { lookup.lookup(&name, &set).await });
        self.pending = Some((self.generation, handle));
    }

    /// Empty the slot; any pending result is discarded
    pub fn unbind(&mut self) {
        self.cancel();
        self.generation += 1;
        self.card = None;
        self.state = ImageState::FaceDown;
    }

    /// Wait for the pending lookup (if any) and apply its result
    pub async fn settle(&mut self) -> &ImageState {
        if let Some((generation, handle)) = self.pending.take() {
            let outcome = handle.await;
            if generation == self.generation {
                self.state = match outcome {
                    Ok(Ok(images)) => ImageState::Loaded(images),
                    // Failed lookups and panicked tasks fall back to the card back
                    Ok(Err(_)) => ImageState::FaceDown,
                    Err(e) if e.is_cancelled() => self.state.clone(),
                    Err(_) => ImageState::FaceDown,
                };
            }
        }
        &self.state
    }

    fn cancel(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<L: ImageLookup> Drop for ImageSlot<L> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("Lightning Bolt"), "Lightning+Bolt");
        assert_eq!(encode_query("Fire // Ice"), "Fire+%2F%2F+Ice");
        assert_eq!(encode_query("Lim-Dûl"), "Lim-D%C3%BBl");
    }

    #[tokio::test]
    async fn test_url_template_faces() {
        let lookup = UrlTemplateLookup::new("https://img.example/");

        let single = lookup.lookup("Lightning Bolt", "M11").await.unwrap();
        assert_eq!(
            single.front,
            "https://img.example/cards/named?exact=Lightning+Bolt&format=image&set=M11"
        );
        assert_eq!(single.back, None);

        let dfc = lookup
            .lookup("Delver of Secrets // Insectile Aberration", "")
            .await
            .unwrap();
        assert!(dfc.back.unwrap().ends_with("&face=back"));

        assert!(lookup.lookup("  ", "").await.is_err());
    }
}
