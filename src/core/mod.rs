//! Core table types: card identity and screen geometry

pub mod card;
pub mod entity;
pub mod geometry;

pub use card::Card;
pub use entity::{CardId, CardIdAllocator};
pub use geometry::{Point, Rect};
