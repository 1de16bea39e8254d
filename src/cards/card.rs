//! Cards on the board.
//!
//! A `Card` pairs a stable `CardId` with its `Symbol`. Cards are created
//! once when a deck is dealt and never change; whether a card is face-up
//! is derived from the game state, not stored on the card.

use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Position-stable identifier for a card within one game (0..16).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The ID as a deck index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for CardId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A dealt card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier, equal to the card's position in the deck.
    pub id: CardId,

    /// The face of the card.
    pub symbol: Symbol,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub const fn new(id: CardId, symbol: Symbol) -> Self {
        Self { id, symbol }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(id.index(), 5);
        assert_eq!(CardId::from(5u8), id);
        assert_eq!(format!("{}", id), "Card(5)");
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::new(CardId::new(3), Symbol::Masks);
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
