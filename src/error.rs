//! Error types for the goldfish table

use crate::zones::Zone;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoldfishError {
    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Card {card} is not in the {zone} zone")]
    CardNotInZone { card: u32, zone: Zone },

    #[error("Invalid opening hand: {0}")]
    InvalidHandSetup(String),

    #[error("The {0} zone cannot be searched")]
    UnsearchableZone(Zone),

    #[error("Image lookup failed: {0}")]
    ImageLookup(String),

    #[error("Deck store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GoldfishError>;
