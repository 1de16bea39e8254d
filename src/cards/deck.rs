//! The dealt deck: sixteen cards, two of each symbol.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::symbol::Symbol;
use crate::core::GameRng;

/// Number of cards in a deck.
pub const DECK_SIZE: usize = Symbol::COUNT * 2;

/// Ordered deck of cards. Card ids equal their positions.
///
/// ## Example
///
/// ```
/// use memory_match::cards::{Deck, Symbol};
/// use memory_match::core::GameRng;
///
/// let deck = Deck::shuffled(&mut GameRng::new(42));
/// assert_eq!(deck.len(), 16);
/// for symbol in Symbol::ALL {
///     assert_eq!(deck.iter().filter(|c| c.symbol == symbol).count(), 2);
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deal a fresh deck: every symbol twice, uniformly permuted.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut symbols: Vec<Symbol> = Symbol::ALL.iter().chain(Symbol::ALL.iter()).copied().collect();
        rng.shuffle(&mut symbols);
        let deck = Self::from_order(&symbols);
        debug_assert!(deck.is_valid(), "shuffled deck must hold every symbol twice");
        deck
    }

    /// Build a deck from an explicit symbol order.
    ///
    /// Returns `None` unless the order holds exactly two of every symbol.
    #[must_use]
    pub fn from_symbols(order: &[Symbol]) -> Option<Self> {
        let deck = Self::from_order(order);
        deck.is_valid().then_some(deck)
    }

    fn from_order(order: &[Symbol]) -> Self {
        let cards = order
            .iter()
            .enumerate()
            .map(|(i, &symbol)| Card::new(CardId::new(i as u8), symbol))
            .collect();
        Self { cards }
    }

    /// Check the deck invariants: sixteen cards, ids matching positions,
    /// two of each symbol.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.cards.len() != DECK_SIZE {
            return false;
        }
        if self.cards.iter().enumerate().any(|(i, c)| c.id.index() != i) {
            return false;
        }
        let mut counts = [0usize; Symbol::COUNT];
        for card in &self.cards {
            counts[card.symbol.index()] += 1;
        }
        counts.iter().all(|&n| n == 2)
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty. A dealt deck never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Check if an id belongs to this deck.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        id.index() < self.cards.len()
    }

    /// Iterate cards in deck order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// The two card ids carrying `symbol`, in deck order.
    #[must_use]
    pub fn pair_of(&self, symbol: Symbol) -> [CardId; 2] {
        let mut found = self.cards.iter().filter(|c| c.symbol == symbol).map(|c| c.id);
        match (found.next(), found.next()) {
            (Some(a), Some(b)) => [a, b],
            _ => unreachable!("a valid deck holds every symbol twice"),
        }
    }
}
